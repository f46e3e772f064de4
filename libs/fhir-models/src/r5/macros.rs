//! Builder and accessor boilerplate shared by elements, backbone elements and resources

/// `id`, `extension` and `validating` setters of an element builder
macro_rules! element_builder_methods {
    () => {
        pub fn id(mut self, id: impl Into<String>) -> Self {
            self.id = Some(id.into());
            self
        }

        /// Adds an extension
        pub fn extension(mut self, extension: $crate::r5::datatypes::Extension) -> Self {
            self.extension.push(extension);
            self
        }

        /// Replaces every extension
        pub fn set_extension(
            mut self,
            extension: impl IntoIterator<Item = $crate::r5::datatypes::Extension>,
        ) -> Self {
            self.extension = extension.into_iter().collect();
            self
        }

        /// Whether `build()` runs list, string, reference-type and ele-1 checks (default `true`)
        pub fn validating(mut self, validating: bool) -> Self {
            self.skip_validation = !validating;
            self
        }
    };
}

/// Element setters plus `modifierExtension`
macro_rules! backbone_builder_methods {
    () => {
        element_builder_methods!();

        pub fn modifier_extension(mut self, extension: $crate::r5::datatypes::Extension) -> Self {
            self.modifier_extension.push(extension);
            self
        }

        pub fn set_modifier_extension(
            mut self,
            extension: impl IntoIterator<Item = $crate::r5::datatypes::Extension>,
        ) -> Self {
            self.modifier_extension = extension.into_iter().collect();
            self
        }
    };
}

macro_rules! element_getters {
    () => {
        /// Unique id for inter-element referencing
        pub fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        pub fn extension(&self) -> &[$crate::r5::datatypes::Extension] {
            &self.extension
        }
    };
}

macro_rules! backbone_getters {
    () => {
        element_getters!();

        /// Extensions that cannot be ignored even if unrecognized
        pub fn modifier_extension(&self) -> &[$crate::r5::datatypes::Extension] {
            &self.modifier_extension
        }
    };
}

/// Visits `id` and `extension` (and `modifierExtension` with `backbone`)
macro_rules! accept_element_children {
    ($self:ident, $visitor:ident) => {
        $crate::r5::visitor::accept_optional($self.id.as_ref(), "id", $visitor);
        $crate::r5::visitor::accept_list(&$self.extension, "extension", $visitor);
    };
    ($self:ident, $visitor:ident, backbone) => {
        accept_element_children!($self, $visitor);
        $crate::r5::visitor::accept_list(&$self.modifier_extension, "modifierExtension", $visitor);
    };
}

/// Whether `id` or `extension` (and `modifierExtension` with `backbone`) are present
macro_rules! element_has_children {
    ($self:ident) => {
        $self.id.is_some() || !$self.extension.is_empty()
    };
    ($self:ident, backbone) => {
        element_has_children!($self) || !$self.modifier_extension.is_empty()
    };
}

/// Setters for the resource-level elements held in the flattened `DomainResource`
macro_rules! domain_resource_builder_methods {
    () => {
        pub fn id(mut self, id: $crate::r5::primitives::Id) -> Self {
            self.base.id = Some(id);
            self
        }

        pub fn meta(mut self, meta: $crate::r5::datatypes::Meta) -> Self {
            self.base.meta = Some(meta);
            self
        }

        pub fn implicit_rules(mut self, implicit_rules: $crate::r5::primitives::Uri) -> Self {
            self.base.implicit_rules = Some(implicit_rules);
            self
        }

        pub fn language(mut self, language: $crate::r5::primitives::Code) -> Self {
            self.base.language = Some(language);
            self
        }

        pub fn text(mut self, text: $crate::r5::datatypes::Narrative) -> Self {
            self.base.text = Some(text);
            self
        }

        /// Adds a contained resource
        pub fn contained(mut self, resource: impl Into<$crate::r5::resources::Resource>) -> Self {
            self.base.contained.push(resource.into());
            self
        }

        pub fn set_contained(
            mut self,
            resources: impl IntoIterator<Item = $crate::r5::resources::Resource>,
        ) -> Self {
            self.base.contained = resources.into_iter().collect();
            self
        }

        pub fn extension(mut self, extension: $crate::r5::datatypes::Extension) -> Self {
            self.base.extension.push(extension);
            self
        }

        pub fn set_extension(
            mut self,
            extension: impl IntoIterator<Item = $crate::r5::datatypes::Extension>,
        ) -> Self {
            self.base.extension = extension.into_iter().collect();
            self
        }

        pub fn modifier_extension(mut self, extension: $crate::r5::datatypes::Extension) -> Self {
            self.base.modifier_extension.push(extension);
            self
        }

        pub fn set_modifier_extension(
            mut self,
            extension: impl IntoIterator<Item = $crate::r5::datatypes::Extension>,
        ) -> Self {
            self.base.modifier_extension = extension.into_iter().collect();
            self
        }

        /// Whether `build()` runs list, string, reference-type and ele-1 checks (default `true`)
        pub fn validating(mut self, validating: bool) -> Self {
            self.skip_validation = !validating;
            self
        }
    };
}

macro_rules! domain_resource_getters {
    () => {
        /// Logical id of this artifact
        pub fn id(&self) -> Option<&$crate::r5::primitives::Id> {
            self.base.id.as_ref()
        }

        pub fn meta(&self) -> Option<&$crate::r5::datatypes::Meta> {
            self.base.meta.as_ref()
        }

        pub fn implicit_rules(&self) -> Option<&$crate::r5::primitives::Uri> {
            self.base.implicit_rules.as_ref()
        }

        pub fn language(&self) -> Option<&$crate::r5::primitives::Code> {
            self.base.language.as_ref()
        }

        /// Text summary of the resource, for human interpretation
        pub fn text(&self) -> Option<&$crate::r5::datatypes::Narrative> {
            self.base.text.as_ref()
        }

        /// Contained, inline resources
        pub fn contained(&self) -> &[$crate::r5::resources::Resource] {
            &self.base.contained
        }

        pub fn extension(&self) -> &[$crate::r5::datatypes::Extension] {
            &self.base.extension
        }

        pub fn modifier_extension(&self) -> &[$crate::r5::datatypes::Extension] {
            &self.base.modifier_extension
        }
    };
}

/// A `[x]` choice element: one variant per allowed type, each serialized under its
/// type-suffixed JSON name
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident($ty:ty) => $json_name:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $json_name)]
                $variant($ty),
            )+
        }

        impl $name {
            /// The chosen value as a visitable node
            pub fn as_visitable(&self) -> &dyn $crate::r5::visitor::Visitable {
                match self {
                    $($name::$variant(value) => value,)+
                }
            }

            /// Type-suffixed JSON name of the chosen variant
            pub fn json_name(&self) -> &'static str {
                match self {
                    $($name::$variant(_) => $json_name,)+
                }
            }

            /// Picks the choice out of the properties left over by the enclosing object
            ///
            /// Used as `#[serde(flatten, deserialize_with = "...")]` on an `Option` field.
            /// A malformed value or a second type-suffixed property is an error.
            pub(crate) fn deserialize_flattened<'de, D>(
                deserializer: D,
            ) -> std::result::Result<Option<Self>, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct ChoiceVisitor;

                impl<'de> serde::de::Visitor<'de> for ChoiceVisitor {
                    type Value = Option<$name>;

                    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str("at most one type-suffixed choice property")
                    }

                    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
                    where
                        A: serde::de::MapAccess<'de>,
                    {
                        let mut chosen: Option<$name> = None;
                        while let Some(key) = map.next_key::<String>()? {
                            let choice = match key.as_str() {
                                $(
                                    $json_name => {
                                        // Go through `Value` so buffered numbers keep their precision
                                        let value: serde_json::Value = map.next_value()?;
                                        let value: $ty = serde_json::from_value(value).map_err(|e| {
                                            <A::Error as serde::de::Error>::custom(format_args!(
                                                "{}: {e}",
                                                $json_name
                                            ))
                                        })?;
                                        $name::$variant(value)
                                    }
                                )+
                                _ => {
                                    map.next_value::<serde::de::IgnoredAny>()?;
                                    continue;
                                }
                            };
                            if let Some(previous) = &chosen {
                                return Err(serde::de::Error::custom(format_args!(
                                    "{} and {} are alternatives of the same choice element",
                                    previous.json_name(),
                                    choice.json_name()
                                )));
                            }
                            chosen = Some(choice);
                        }
                        Ok(chosen)
                    }
                }

                deserializer.deserialize_map(ChoiceVisitor)
            }
        }
    };
}
