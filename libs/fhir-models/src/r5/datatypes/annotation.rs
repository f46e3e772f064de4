use super::{Extension, Reference};
use crate::error::{Error, Result};
use crate::r5::primitives::{DateTime, Markdown};
use crate::r5::validation;
use crate::r5::visitor::{accept_optional, walk, Visitable, Visitor};
use serde::{Deserialize, Serialize};

/// Text node with attribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,

    #[serde(flatten, deserialize_with = "AnnotationAuthor::deserialize_flattened")]
    author: Option<AnnotationAuthor>,

    /// When the annotation was made
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<DateTime>,

    /// The annotation - text content (as markdown)
    text: Markdown,
}

choice_enum!(
    /// `Annotation.author[x]`
    AnnotationAuthor {
        Reference(Reference) => "authorReference",
        String(String) => "authorString",
    }
);

impl Annotation {
    pub fn builder() -> AnnotationBuilder {
        AnnotationBuilder::default()
    }

    pub fn to_builder(&self) -> AnnotationBuilder {
        AnnotationBuilder {
            id: self.id.clone(),
            extension: self.extension.clone(),
            author: self.author.clone(),
            time: self.time.clone(),
            text: Some(self.text.clone()),
            skip_validation: false,
        }
    }

    element_getters!();

    pub fn author(&self) -> Option<&AnnotationAuthor> {
        self.author.as_ref()
    }

    pub fn time(&self) -> Option<&DateTime> {
        self.time.as_ref()
    }

    pub fn text(&self) -> &Markdown {
        &self.text
    }
}

#[derive(Debug, Default)]
pub struct AnnotationBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    author: Option<AnnotationAuthor>,
    time: Option<DateTime>,
    text: Option<Markdown>,
    skip_validation: bool,
}

impl AnnotationBuilder {
    element_builder_methods!();

    pub fn author(mut self, author: AnnotationAuthor) -> Self {
        self.author = Some(author);
        self
    }

    pub fn time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn text(mut self, text: Markdown) -> Self {
        self.text = Some(text);
        self
    }

    pub fn build(self) -> Result<Annotation> {
        let annotation = Annotation {
            id: self.id,
            extension: self.extension,
            author: self.author,
            time: self.time,
            text: self.text.ok_or(Error::MissingElement("text"))?,
        };
        if !self.skip_validation {
            annotation.validate()?;
        }
        Ok(annotation)
    }
}

impl Visitable for Annotation {
    fn type_name(&self) -> &'static str {
        "Annotation"
    }

    fn has_children(&self) -> bool {
        // text is required, so an Annotation always has children
        true
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |visitor| {
            accept_element_children!(self, visitor);
            if let Some(author) = &self.author {
                author.as_visitable().accept("author", None, visitor);
            }
            accept_optional(self.time.as_ref(), "time", visitor);
            self.text.accept("text", None, visitor);
        });
    }

    fn validate(&self) -> Result<()> {
        validation::check_optional_string(self.id.as_deref(), "id")?;
        match &self.author {
            Some(AnnotationAuthor::String(author)) => validation::check_string(author, "author")?,
            Some(AnnotationAuthor::Reference(reference)) => validation::check_reference_type(
                Some(reference),
                "author",
                &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson", "Organization"],
            )?,
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_choice_names() {
        let annotation: Annotation = serde_json::from_value(json!({
            "authorString": "Dr. Adams",
            "text": "Sample hemolyzed"
        }))
        .unwrap();
        assert_eq!(
            annotation.author(),
            Some(&AnnotationAuthor::String("Dr. Adams".to_string()))
        );
        assert_eq!(annotation.text().as_str(), "Sample hemolyzed");

        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["authorString"], "Dr. Adams");
        assert!(value.get("author").is_none());
    }

    #[test]
    fn test_annotation_requires_text() {
        let err = Annotation::builder().build().unwrap_err();
        assert!(matches!(err, Error::MissingElement("text")));
    }

    #[test]
    fn test_author_reference_type() {
        let result = Annotation::builder()
            .author(AnnotationAuthor::Reference(
                Reference::builder().reference("Device/1").build().unwrap(),
            ))
            .text(Markdown::new("note").unwrap())
            .build();
        assert!(matches!(result, Err(Error::InvalidReferenceType { element: "author", .. })));
    }
}
