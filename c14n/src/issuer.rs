//! I define [`IdentifierIssuer`],
//! the bijective allocator of canonical blank node labels.

use std::collections::BTreeMap;
use std::rc::Rc;

/// A bijective, insertion-ordered mapping
/// from original blank node labels to newly minted labels
/// of the form `{prefix}{counter}`.
///
/// Two issuers are independent until explicitly
/// [merged](IdentifierIssuer::merge_into);
/// the permutation search relies on `clone` producing
/// a deep, independent snapshot.
#[derive(Clone, Debug)]
pub struct IdentifierIssuer {
    prefix: Box<str>,
    issued: BTreeMap<Rc<str>, Rc<str>>,
    // the counter is issued_order.len(): entries are never removed
    issued_order: Vec<Rc<str>>,
}

impl IdentifierIssuer {
    /// Build an issuer minting labels under the given prefix
    /// (without the `_:` lead-in, which is added at serialization sites).
    pub fn new(prefix: &str) -> Self {
        IdentifierIssuer {
            prefix: prefix.into(),
            issued: BTreeMap::new(),
            issued_order: vec![],
        }
    }

    /// Return the label issued for `old_label`,
    /// minting a new one on first request,
    /// together with a flag telling whether it was newly minted.
    ///
    /// Idempotent per `old_label`.
    pub fn issue(&mut self, old_label: &str) -> (Rc<str>, bool) {
        if let Some(label) = self.issued.get(old_label) {
            return (Rc::clone(label), false);
        }
        let key: Rc<str> = Rc::from(old_label);
        let label: Rc<str> = format!("{}{}", self.prefix, self.issued_order.len()).into();
        self.issued.insert(Rc::clone(&key), Rc::clone(&label));
        self.issued_order.push(key);
        (label, true)
    }

    /// Whether a label was already issued for `old_label`.
    pub fn has_label(&self, old_label: &str) -> bool {
        self.issued.contains_key(old_label)
    }

    /// The label issued for `old_label`, if any. Never mutates.
    pub fn get(&self, old_label: &str) -> Option<&str> {
        self.issued.get(old_label).map(|label| &**label)
    }

    /// Request from `other` a label for every old label known to `self`,
    /// in `self`'s issuance order.
    ///
    /// `other` only mints labels for old labels it does not know yet,
    /// so its numbering reflects path-selection order,
    /// not original input order.
    pub fn merge_into(&self, other: &mut IdentifierIssuer) {
        for old_label in &self.issued_order {
            other.issue(old_label);
        }
    }

    /// Consume the issuer, returning its old-label to label mapping.
    pub fn into_map(self) -> BTreeMap<Rc<str>, Rc<str>> {
        self.issued
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn labels_follow_issuance_order() {
        let mut issuer = IdentifierIssuer::new("c14n");
        assert_eq!(&*issuer.issue("z").0, "c14n0");
        assert_eq!(&*issuer.issue("a").0, "c14n1");
        assert_eq!(&*issuer.issue("m").0, "c14n2");
    }

    #[test]
    fn issue_is_idempotent() {
        let mut issuer = IdentifierIssuer::new("b");
        let (first, new) = issuer.issue("x");
        assert!(new);
        issuer.issue("y");
        let (again, new) = issuer.issue("x");
        assert!(!new);
        assert_eq!(first, again);
    }

    #[test]
    fn never_reuses_a_label() {
        let mut issuer = IdentifierIssuer::new("b");
        let mut labels = std::collections::HashSet::new();
        for old in ["e", "d", "c", "b", "a"] {
            assert!(labels.insert(issuer.issue(old).0));
        }
    }

    #[test]
    fn get_and_has_label_do_not_mutate() {
        let mut issuer = IdentifierIssuer::new("b");
        issuer.issue("x");
        assert!(!issuer.has_label("y"));
        assert_eq!(issuer.get("y"), None);
        assert_eq!(&*issuer.issue("z").0, "b1");
    }

    #[test]
    fn clone_is_independent() {
        let mut issuer = IdentifierIssuer::new("b");
        issuer.issue("x");
        let mut copy = issuer.clone();
        copy.issue("y");
        assert!(!issuer.has_label("y"));
        // both branches keep minting from the snapshot counter
        assert_eq!(&*issuer.issue("z").0, "b1");
        assert_eq!(copy.get("y"), Some("b1"));
    }

    #[test]
    fn merge_preserves_issuance_order() {
        let mut local = IdentifierIssuer::new("b");
        local.issue("z");
        local.issue("a");
        let mut canonical = IdentifierIssuer::new("c14n");
        canonical.issue("q");
        local.merge_into(&mut canonical);
        assert_eq!(canonical.get("q"), Some("c14n0"));
        assert_eq!(canonical.get("z"), Some("c14n1"));
        assert_eq!(canonical.get("a"), Some("c14n2"));
    }

    #[test]
    fn merge_skips_already_issued() {
        let mut local = IdentifierIssuer::new("b");
        local.issue("x");
        local.issue("y");
        let mut canonical = IdentifierIssuer::new("c14n");
        canonical.issue("y");
        local.merge_into(&mut canonical);
        assert_eq!(canonical.get("y"), Some("c14n0"));
        assert_eq!(canonical.get("x"), Some("c14n1"));
    }
}
