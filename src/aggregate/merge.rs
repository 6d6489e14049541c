use serde::Serialize;
use std::fmt::Debug;

/// A typed registry record whose fields are all optional.
///
/// `Default` is the fully null record a registry starts from on first sight
/// of a key.
pub trait Record: Default + Clone + PartialEq + Debug + Serialize {
    /// Folds `incoming` into `self` field by field: an absent field takes the
    /// incoming value, a present field is never overwritten and never cleared.
    ///
    /// Returns the names of fields where both sides were present and
    /// disagreed. The existing value is kept for those.
    fn merge(&mut self, incoming: Self) -> Vec<&'static str>;
}

/// Implements [`Record`] for a struct of `Option` fields using
/// first-non-null-wins.
macro_rules! impl_record {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::aggregate::merge::Record for $ty {
            fn merge(&mut self, incoming: Self) -> Vec<&'static str> {
                let mut conflicts = Vec::new();
                $(
                    if let Some(value) = incoming.$field {
                        if self.$field.is_none() {
                            self.$field = Some(value);
                        } else if self.$field.as_ref() != Some(&value) {
                            conflicts.push(stringify!($field));
                        }
                    }
                )+
                conflicts
            }
        }
    };
}

pub(crate) use impl_record;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct Sample {
        name: Option<String>,
        level: Option<f64>,
    }

    impl_record!(Sample { name, level });

    #[test]
    fn test_merge_fills_only_absent_fields() {
        let mut record = Sample {
            name: Some("first".into()),
            level: None,
        };
        let conflicts = record.merge(Sample {
            name: None,
            level: Some(2.5),
        });

        assert!(conflicts.is_empty());
        assert_eq!(record.name.as_deref(), Some("first"));
        assert_eq!(record.level, Some(2.5));
    }

    #[test]
    fn test_merge_keeps_first_value_and_reports_disagreement() {
        let mut record = Sample {
            name: Some("first".into()),
            level: Some(1.0),
        };
        let conflicts = record.merge(Sample {
            name: Some("second".into()),
            level: Some(1.0),
        });

        assert_eq!(conflicts, vec!["name"]);
        assert_eq!(record.name.as_deref(), Some("first"));
    }

    #[test]
    fn test_merging_same_record_twice_is_idempotent() {
        let incoming = Sample {
            name: Some("x".into()),
            level: Some(3.0),
        };
        let mut once = Sample::default();
        once.merge(incoming.clone());
        let mut twice = once.clone();
        let conflicts = twice.merge(incoming);

        assert!(conflicts.is_empty());
        assert_eq!(once, twice);
    }
}
