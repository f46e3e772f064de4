//! Codes for elements bound to a value set with `required` strength
//!
//! Each enum is closed: a value outside the value set cannot be represented, so the
//! binding is enforced by construction and by deserialization.

use super::visitor::{walk, PrimitiveValue, Visitable, Visitor};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $value_set:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $code:literal, $display:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Canonical URL of the bound value set
            pub const VALUE_SET: &'static str = $value_set;

            /// Every code in the value set, in definition order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn display(&self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(Error::InvalidCode {
                        value_set: $value_set,
                        code: s.to_string(),
                    }),
                }
            }
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                "code"
            }

            fn has_children(&self) -> bool {
                false
            }

            fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
                walk(self, element_name, element_index, visitor, |_| {});
            }

            fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
                Some(PrimitiveValue::String(self.code()))
            }
        }
    };
}

code_enum!(
    /// Codes providing the status/availability of a specimen
    SpecimenStatus, "http://hl7.org/fhir/ValueSet/specimen-status|5.0.0" {
        Available => "available", "Available",
        Unavailable => "unavailable", "Unavailable",
        Unsatisfactory => "unsatisfactory", "Unsatisfactory",
        EnteredInError => "entered-in-error", "Entered in Error",
    }
);

code_enum!(
    /// Whether a specimen is a group or a pool of specimens
    SpecimenCombined, "http://hl7.org/fhir/ValueSet/specimen-combined|5.0.0" {
        Grouped => "grouped", "Grouped",
        Pooled => "pooled", "Pooled",
    }
);

code_enum!(
    /// Status of a financial resource such as Coverage
    CoverageStatus, "http://hl7.org/fhir/ValueSet/fm-status|5.0.0" {
        Active => "active", "Active",
        Cancelled => "cancelled", "Cancelled",
        Draft => "draft", "Draft",
        EnteredInError => "entered-in-error", "Entered in Error",
    }
);

code_enum!(
    /// The kind of coverage: insurance, installment payment plan or self-pay
    CoverageKind, "http://hl7.org/fhir/ValueSet/coverage-kind|5.0.0" {
        Insurance => "insurance", "Insurance",
        SelfPay => "self-pay", "Self-pay",
        Other => "other", "Other",
    }
);

code_enum!(
    /// Status of an ImagingSelection
    ImagingSelectionStatus, "http://hl7.org/fhir/ValueSet/imagingselection-status|5.0.0" {
        Available => "available", "Available",
        EnteredInError => "entered-in-error", "Entered in Error",
        Unknown => "unknown", "Unknown",
    }
);

code_enum!(
    /// Shape of a 2D image region
    ImagingSelection2DGraphicType, "http://hl7.org/fhir/ValueSet/imagingselection-2dgraphictype|5.0.0" {
        Point => "point", "POINT",
        Polyline => "polyline", "POLYLINE",
        Interpolated => "interpolated", "INTERPOLATED",
        Circle => "circle", "CIRCLE",
        Ellipse => "ellipse", "ELLIPSE",
    }
);

code_enum!(
    /// Shape of a 3D image region
    ImagingSelection3DGraphicType, "http://hl7.org/fhir/ValueSet/imagingselection-3dgraphictype|5.0.0" {
        Point => "point", "POINT",
        Multipoint => "multipoint", "MULTIPOINT",
        Polyline => "polyline", "POLYLINE",
        Polygon => "polygon", "POLYGON",
        Ellipse => "ellipse", "ELLIPSE",
        Ellipsoid => "ellipsoid", "ELLIPSOID",
    }
);

code_enum!(
    /// Status of a Permission
    PermissionStatus, "http://hl7.org/fhir/ValueSet/permission-status|5.0.0" {
        Active => "active", "Active",
        EnteredInError => "entered-in-error", "Entered in Error",
        Draft => "draft", "Draft",
        Rejected => "rejected", "Rejected",
    }
);

code_enum!(
    /// How the rules of a Permission are combined
    PermissionRuleCombining, "http://hl7.org/fhir/ValueSet/permission-rule-combining|5.0.0" {
        DenyOverrides => "deny-overrides", "Deny-overrides",
        PermitOverrides => "permit-overrides", "Permit-overrides",
        OrderedDenyOverrides => "ordered-deny-overrides", "Ordered-deny-overrides",
        OrderedPermitOverrides => "ordered-permit-overrides", "Ordered-permit-overrides",
        DenyUnlessPermit => "deny-unless-permit", "Deny-unless-permit",
        PermitUnlessDeny => "permit-unless-deny", "Permit-unless-deny",
    }
);

code_enum!(
    /// Whether a rule permits or denies
    ConsentProvisionType, "http://hl7.org/fhir/ValueSet/consent-provision-type|5.0.0" {
        Deny => "deny", "Deny",
        Permit => "permit", "Permit",
    }
);

code_enum!(
    /// How a resource reference is interpreted when testing consent restrictions
    ConsentDataMeaning, "http://hl7.org/fhir/ValueSet/consent-data-meaning|5.0.0" {
        Instance => "instance", "Instance",
        Related => "related", "Related",
        Dependents => "dependents", "Dependents",
        AuthoredBy => "authoredby", "AuthoredBy",
    }
);

code_enum!(
    /// Status of a narrative
    NarrativeStatus, "http://hl7.org/fhir/ValueSet/narrative-status|5.0.0" {
        Generated => "generated", "Generated",
        Extensions => "extensions", "Extensions",
        Additional => "additional", "Additional",
        Empty => "empty", "Empty",
    }
);

code_enum!(
    /// Purpose of an identifier
    IdentifierUse, "http://hl7.org/fhir/ValueSet/identifier-use|5.0.0" {
        Usual => "usual", "Usual",
        Official => "official", "Official",
        Temp => "temp", "Temp",
        Secondary => "secondary", "Secondary",
        Old => "old", "Old",
    }
);

code_enum!(
    /// How a quantity value should be understood
    QuantityComparator, "http://hl7.org/fhir/ValueSet/quantity-comparator|5.0.0" {
        LessThan => "<", "Less than",
        LessOrEqual => "<=", "Less or Equal to",
        GreaterOrEqual => ">=", "Greater or Equal to",
        GreaterThan => ">", "Greater than",
        Sufficient => "ad", "Sufficient to achieve this total quantity",
    }
);

code_enum!(
    /// Degree to which a coded element is bound to its value set
    BindingStrength, "http://hl7.org/fhir/ValueSet/binding-strength|5.0.0" {
        Required => "required", "Required",
        Extensible => "extensible", "Extensible",
        Preferred => "preferred", "Preferred",
        Example => "example", "Example",
    }
);

code_enum!(
    /// Standards status of an artifact
    StandardsStatus, "http://hl7.org/fhir/ValueSet/standards-status|5.0.0" {
        Draft => "draft", "Draft",
        Normative => "normative", "Normative",
        TrialUse => "trial-use", "Trial-Use",
        Informative => "informative", "Informative",
        Deprecated => "deprecated", "Deprecated",
        External => "external", "External",
    }
);

code_enum!(
    /// Severity of a constraint violation
    ConstraintLevel, "http://hl7.org/fhir/ValueSet/constraint-severity|5.0.0" {
        Error => "error", "Error",
        Warning => "warning", "Warning",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for status in SpecimenStatus::ALL {
            assert_eq!(&status.code().parse::<SpecimenStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_code() {
        let err = "pending".parse::<CoverageStatus>().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCode { value_set, .. } if value_set == CoverageStatus::VALUE_SET
        ));
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_value(QuantityComparator::LessOrEqual).unwrap();
        assert_eq!(json, "<=");
        let kind: CoverageKind = serde_json::from_value(serde_json::json!("self-pay")).unwrap();
        assert_eq!(kind, CoverageKind::SelfPay);
    }
}
