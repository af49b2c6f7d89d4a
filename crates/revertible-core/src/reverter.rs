//! Per-field reversion accumulation for aggregate types.

use crate::lens::Lens;
use crate::reversion::Reversion;
use crate::revertible::Revertible;

/// Collects per-field reversions for an aggregate value of type `Root` into
/// one composite reversion.
///
/// Record types call [`Reverter::field`] once per tracked field. Sum types
/// compare cases first: a changed case calls [`Reverter::replace`], an
/// unchanged one diffs each payload position through a case lens.
pub struct Reverter<Root> {
    reversion: Reversion<Root>,
    replaced: bool,
}

impl<Root: 'static> Default for Reverter<Root> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Root: 'static> Reverter<Root> {
    pub fn new() -> Self {
        Reverter {
            reversion: Reversion::new(),
            replaced: false,
        }
    }

    /// Diffs one tracked field and projects the result through its lens.
    pub fn field<T: Revertible>(&mut self, current: &T, previous: &T, lens: Lens<Root, T>) {
        if self.replaced {
            // A whole-value overwrite already restores every field.
            return;
        }
        if let Some(reversion) = current.reversion_to(previous) {
            self.reversion.extend(reversion.project(&lens));
        }
    }

    /// Records a whole-value overwrite, superseding any per-field edits.
    ///
    /// Used when the active case of a sum type differs between current and
    /// previous; variants are not field-wise comparable.
    pub fn replace(&mut self, previous: &Root)
    where
        Root: Clone + Send + Sync,
    {
        self.reversion = Reversion::overwrite(previous.clone());
        self.replaced = true;
    }

    /// The composite reversion, or `None` if no field changed.
    pub fn finish(self) -> Option<Reversion<Root>> {
        self.reversion.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    impl Revertible for Person {
        fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
            let mut reverter = Reverter::new();
            reverter.field(
                &self.name,
                &previous.name,
                Lens::field(|p: &Person| &p.name, |p: &mut Person| &mut p.name),
            );
            reverter.field(
                &self.age,
                &previous.age,
                Lens::field(|p: &Person| &p.age, |p: &mut Person| &mut p.age),
            );
            reverter.finish()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Contact {
        Email(String),
        Phone { number: String, mobile: bool },
    }

    impl Revertible for Contact {
        fn reversion_to(&self, previous: &Self) -> Option<Reversion<Self>> {
            let mut reverter = Reverter::new();
            match (self, previous) {
                (Contact::Email(current), Contact::Email(prev)) => {
                    reverter.field(
                        current,
                        prev,
                        Lens::case(
                            |c: &Contact| match c {
                                Contact::Email(address) => Some(address),
                                _ => None,
                            },
                            |c: &mut Contact| match c {
                                Contact::Email(address) => Some(address),
                                _ => None,
                            },
                        ),
                    );
                }
                (
                    Contact::Phone { number, mobile },
                    Contact::Phone {
                        number: prev_number,
                        mobile: prev_mobile,
                    },
                ) => {
                    reverter.field(
                        number,
                        prev_number,
                        Lens::case(
                            |c: &Contact| match c {
                                Contact::Phone { number, .. } => Some(number),
                                _ => None,
                            },
                            |c: &mut Contact| match c {
                                Contact::Phone { number, .. } => Some(number),
                                _ => None,
                            },
                        ),
                    );
                    reverter.field(
                        mobile,
                        prev_mobile,
                        Lens::case(
                            |c: &Contact| match c {
                                Contact::Phone { mobile, .. } => Some(mobile),
                                _ => None,
                            },
                            |c: &mut Contact| match c {
                                Contact::Phone { mobile, .. } => Some(mobile),
                                _ => None,
                            },
                        ),
                    );
                }
                _ => reverter.replace(previous),
            }
            reverter.finish()
        }
    }

    #[test]
    fn unchanged_record_produces_nothing() {
        let person = Person {
            name: "Ada".into(),
            age: 36,
        };
        assert!(person.reversion_to(&person.clone()).is_none());
    }

    #[test]
    fn changed_fields_round_trip() {
        let previous = Person {
            name: "Ada".into(),
            age: 36,
        };
        let current = Person {
            name: "Ada Lovelace".into(),
            age: 37,
        };
        let reversion = current.reversion_to(&previous).unwrap();
        let mut value = current.clone();
        reversion.apply(&mut value);
        assert_eq!(value, previous);
    }

    #[test]
    fn same_case_diffs_payload() {
        let previous = Contact::Phone {
            number: "555-0100".into(),
            mobile: false,
        };
        let current = Contact::Phone {
            number: "555-0199".into(),
            mobile: false,
        };
        let reversion = current.reversion_to(&previous).unwrap();
        let mut value = current;
        reversion.apply(&mut value);
        assert_eq!(value, previous);
    }

    #[test]
    fn case_change_overwrites_whole_value() {
        let previous = Contact::Email("ada@example.com".into());
        let current = Contact::Phone {
            number: "555-0100".into(),
            mobile: true,
        };
        let reversion = current.reversion_to(&previous).unwrap();
        assert_eq!(reversion.len(), 1);
        let mut value = current;
        reversion.apply(&mut value);
        assert_eq!(value, previous);
    }
}
