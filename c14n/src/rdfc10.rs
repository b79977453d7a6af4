//! I provide the implementation of the RDFC-1.0 algorithm described at
//! <https://www.w3.org/TR/rdf-canon/>

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::rc::Rc;

use rdfc_model::nq::{nq_quad, nq_term};
use rdfc_model::{Quad, Term};

use crate::_permutations::for_each_permutation_of;
use crate::deadline::Deadline;
use crate::hash::{HashAlgorithm, Hasher};
use crate::issuer::IdentifierIssuer;
use crate::C14nError;

/// The default wall-clock budget of a canonicalization run, in milliseconds.
pub const DEFAULT_DEADLINE_MS: i64 = 3000;

/// An identifier map as returned by [`relabel`] and [`relabel_with`]:
/// original blank node label to canonical label (without the `_:` prefix).
pub type C14nIdMap = BTreeMap<Rc<str>, Rc<str>>;

const CANONICAL_PREFIX: &str = "c14n";
const TEMP_PREFIX: &str = "b";

/// Write into `w` a canonical N-Quads representation of `d`, where
/// + blank nodes are canonically [relabelled](relabel) with
///   the SHA-256 hash function and the [`DEFAULT_DEADLINE_MS`] budget;
/// + quads are sorted in codepoint order.
///
/// See also [`normalize_with`].
pub fn normalize<W: io::Write>(d: &[Quad], w: W) -> Result<(), C14nError> {
    normalize_with(d, w, HashAlgorithm::Sha256, DEFAULT_DEADLINE_MS)
}

/// Write into `w` a canonical N-Quads representation of `d`, where
/// + blank nodes are canonically [relabelled](relabel_sha384) with
///   the SHA-384 hash function and the [`DEFAULT_DEADLINE_MS`] budget;
/// + quads are sorted in codepoint order.
///
/// See also [`normalize_with`].
pub fn normalize_sha384<W: io::Write>(d: &[Quad], w: W) -> Result<(), C14nError> {
    normalize_with(d, w, HashAlgorithm::Sha384, DEFAULT_DEADLINE_MS)
}

/// Write into `w` a canonical N-Quads representation of `d`, where
/// + blank nodes are canonically [relabelled](relabel_with) with
///   the given hash function and deadline budget;
/// + quads are sorted in codepoint order.
///
/// An empty dataset produces no output at all (not even a newline).
///
/// See also [`normalize`].
pub fn normalize_with<W: io::Write>(
    d: &[Quad],
    mut w: W,
    algorithm: HashAlgorithm,
    deadline_ms: i64,
) -> Result<(), C14nError> {
    let (quads, _) = relabel_with(d, algorithm, deadline_ms)?;
    let mut lines: Vec<String> = quads
        .iter()
        .map(|quad| {
            let mut line = String::new();
            nq_quad(quad, &mut line);
            line
        })
        .collect();
    lines.sort_unstable();
    for line in &lines {
        w.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Return the quads of `d` with every blank node relabelled canonically,
/// paired with the mapping from original to canonical labels,
/// using the SHA-256 hash function and the [`DEFAULT_DEADLINE_MS`] budget.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>
///
/// See also [`normalize`].
pub fn relabel(d: &[Quad]) -> Result<(Vec<Quad>, C14nIdMap), C14nError> {
    relabel_with(d, HashAlgorithm::Sha256, DEFAULT_DEADLINE_MS)
}

/// Return the quads of `d` with every blank node relabelled canonically,
/// paired with the mapping from original to canonical labels,
/// using the SHA-384 hash function and the [`DEFAULT_DEADLINE_MS`] budget.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>
///
/// See also [`normalize`].
pub fn relabel_sha384(d: &[Quad]) -> Result<(Vec<Quad>, C14nIdMap), C14nError> {
    relabel_with(d, HashAlgorithm::Sha384, DEFAULT_DEADLINE_MS)
}

/// Return the quads of `d` with every blank node relabelled canonically,
/// paired with the mapping from original to canonical labels.
///
/// A dataset is a set of quads: duplicates in `d` are ignored,
/// and the returned quads contain each distinct quad once,
/// in first-occurrence order.
///
/// The `deadline_ms` budget bounds the wall-clock time of the whole run,
/// securing it against [dataset poisoning]:
/// adversarial datasets with large clusters of symmetric blank nodes
/// force a factorial permutation search and are expected
/// to fail with [`C14nError::DeadlineExceeded`].
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>
///
/// See also [`relabel`], [`normalize_with`].
///
/// [dataset poisoning]: https://www.w3.org/TR/rdf-canon/#dataset-poisoning
pub fn relabel_with(
    d: &[Quad],
    algorithm: HashAlgorithm,
    deadline_ms: i64,
) -> Result<(Vec<Quad>, C14nIdMap), C14nError> {
    let mut state = C14nState::new(algorithm, Deadline::new(deadline_ms)?);
    // the first tick records the start of the run
    state.deadline.tick()?;
    // a dataset is a set of quads: drop duplicates,
    // keeping the first occurrence of each
    let mut seen = BTreeSet::new();
    let dataset: Vec<&Quad> = d.iter().filter(|quad| seen.insert(*quad)).collect();
    // Step 1: index every quad under each blank node it mentions
    state.index(&dataset);
    // Steps 2-3: assign canonical labels to all unambiguous blank nodes
    state.issue_simple_ids()?;
    // Steps 4-5: disambiguate the rest by n-degree hashing
    state.issue_n_degree_ids()?;
    // Step 6: substitute canonical labels
    let issued = state.canonical.into_map();
    let quads = dataset
        .iter()
        .map(|quad| {
            let convert = |term: &Term| match term.bnode_id() {
                Some(bnid) => {
                    let canon = issued
                        .get(bnid)
                        .expect("every blank node has a canonical label");
                    Term::BlankNode(canon.as_ref().into())
                }
                None => term.clone(),
            };
            Quad {
                s: convert(&quad.s),
                p: quad.p.clone(),
                o: convert(&quad.o),
                g: quad.g.as_ref().map(convert),
            }
        })
        .collect();
    Ok((quads, issued))
}

/// The per-run state of the canonicalization engine.
///
/// All of it is owned by the run and discarded at its end;
/// the hasher and the deadline are single shared instances
/// threaded through every hash computation.
struct C14nState<'a> {
    b2q: BTreeMap<Rc<str>, Vec<&'a Quad>>,
    h2b: BTreeMap<String, BTreeSet<Rc<str>>>,
    non_normalized: BTreeSet<Rc<str>>,
    canonical: IdentifierIssuer,
    hasher: Hasher,
    deadline: Deadline,
}

impl<'a> C14nState<'a> {
    fn new(algorithm: HashAlgorithm, deadline: Deadline) -> Self {
        C14nState {
            b2q: BTreeMap::new(),
            h2b: BTreeMap::new(),
            non_normalized: BTreeSet::new(),
            canonical: IdentifierIssuer::new(CANONICAL_PREFIX),
            hasher: Hasher::new(algorithm),
            deadline,
        }
    }

    /// Build the blank node index: each quad is recorded once
    /// under every blank node it mentions,
    /// even when that node occupies several positions of the quad.
    fn index(&mut self, quads: &[&'a Quad]) {
        for &quad in quads {
            for term in [Some(&quad.s), Some(&quad.o), quad.g.as_ref()]
                .into_iter()
                .flatten()
            {
                if let Some(bnid) = term.bnode_id() {
                    let entry = self.b2q.entry(Rc::from(bnid)).or_default();
                    // quads are visited in order, so a repeated mention
                    // of the same blank node is always the last entry
                    if entry.last().map_or(true, |last| !std::ptr::eq(*last, quad)) {
                        entry.push(quad);
                    }
                }
            }
        }
        self.non_normalized = self.b2q.keys().cloned().collect();
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-1d-quads>
    fn hash_first_degree(&mut self, bnid: &str) -> Result<String, C14nError> {
        let quads = self.b2q.get(bnid).expect("blank node is indexed");
        hash_first_degree_quads(bnid, quads, &mut self.hasher, &mut self.deadline)
    }

    /// Fixpoint loop assigning canonical labels to every blank node
    /// whose first-degree hash is unique.
    ///
    /// Hash groups with two or more members are left in `h2b`
    /// for n-degree resolution; such collisions are reported
    /// (logged) but never fatal.
    fn issue_simple_ids(&mut self) -> Result<(), C14nError> {
        let mut simple = true;
        while simple {
            self.deadline.tick()?;
            simple = false;
            self.h2b.clear();
            let pending: Vec<Rc<str>> = self.non_normalized.iter().cloned().collect();
            for bnid in pending {
                let hash = self.hash_first_degree(&bnid)?;
                self.h2b.entry(hash).or_default().insert(bnid);
            }
            let hashes: Vec<String> = self.h2b.keys().cloned().collect();
            for hash in hashes {
                self.deadline.tick()?;
                let bnids = self.h2b.get(&hash).expect("group was just built");
                if bnids.len() == 1 {
                    let bnid = bnids.first().cloned().expect("group is non-empty");
                    self.canonical.issue(&bnid);
                    self.non_normalized.remove(&bnid);
                    self.h2b.remove(&hash);
                    simple = true;
                }
            }
        }
        // the surviving groups share their hash with a sibling;
        // report each once and defer them to n-degree resolution
        for (hash, bnids) in &self.h2b {
            log::debug!("first-degree hash collision {hash} shared by {bnids:?}");
        }
        Ok(())
    }

    /// Resolve the remaining hash groups, in ascending hash order:
    /// compute an n-degree hash for every member,
    /// then merge the resulting issuers into the canonical issuer
    /// in ascending n-degree hash order,
    /// which breaks the symmetry deterministically.
    fn issue_n_degree_ids(&mut self) -> Result<(), C14nError> {
        let h2b = std::mem::take(&mut self.h2b);
        for bnids in h2b.into_values() {
            let mut hash_path_list: Vec<NDegreeResult> = vec![];
            for bnid in &bnids {
                self.deadline.tick()?;
                if self.canonical.has_label(bnid) {
                    continue;
                }
                let mut issuer = IdentifierIssuer::new(TEMP_PREFIX);
                issuer.issue(bnid);
                hash_path_list.push(self.hash_n_degree_quads(bnid, &issuer)?);
            }
            hash_path_list.sort_unstable();
            for result in hash_path_list {
                self.deadline.tick()?;
                result.issuer.merge_into(&mut self.canonical);
            }
        }
        Ok(())
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-related-blank-node>
    ///
    /// The related node is identified by its canonical label if it has one,
    /// else by its label under `issuer` if it has one,
    /// else by its first-degree hash (computed fresh, mutating no issuer).
    fn hash_related_blank_node(
        &mut self,
        related: &str,
        quad: &Quad,
        issuer: &IdentifierIssuer,
        position: &str,
    ) -> Result<String, C14nError> {
        let id = if let Some(canon_id) = self.canonical.get(related) {
            format!("_:{canon_id}")
        } else if let Some(temp_id) = issuer.get(related) {
            format!("_:{temp_id}")
        } else {
            self.hash_first_degree(related)?
        };
        self.hasher.reset();
        self.hasher.update(position);
        if position != "g" {
            self.hasher.update("<");
            self.hasher
                .update(quad.p.as_iri().expect("predicate must be an IRI"));
            self.hasher.update(">");
        }
        self.hasher.update(&id);
        Ok(self.hasher.hex_digest())
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-nd-quads>
    ///
    /// `issuer` must already have a label for `id`.
    fn hash_n_degree_quads(
        &mut self,
        id: &str,
        issuer: &IdentifierIssuer,
    ) -> Result<NDegreeResult, C14nError> {
        let mut issuer = issuer.clone();
        // Step 1: group the blank nodes related to `id` by relation hash
        let quads = self.b2q.get(id).expect("blank node is indexed").clone();
        let mut hash_to_related: BTreeMap<String, BTreeSet<Rc<str>>> = BTreeMap::new();
        for quad in &quads {
            self.deadline.tick()?;
            for (term, position) in [
                (Some(&quad.s), "s"),
                (Some(&quad.o), "o"),
                (quad.g.as_ref(), "g"),
            ] {
                let Some(term) = term else { continue };
                let Some(related) = term.bnode_id() else { continue };
                if related == id {
                    continue;
                }
                let hash = self.hash_related_blank_node(related, quad, &issuer, position)?;
                hash_to_related.entry(hash).or_default().insert(Rc::from(related));
            }
        }
        // Steps 2-3: per group (ascending hash order), try every permutation
        // of its members and keep the lexicographically smallest path
        let mut data_to_hash = String::new();
        for (related_hash, group) in hash_to_related {
            data_to_hash.push_str(&related_hash);
            let mut members: Vec<Rc<str>> = group.into_iter().collect();
            let mut chosen_path = String::new();
            let mut chosen_issuer: Option<IdentifierIssuer> = None;
            for_each_permutation_of(&mut members, |permutation| -> Result<(), C14nError> {
                self.deadline.tick()?;
                let mut issuer_copy = issuer.clone();
                let mut path = String::new();
                let mut recursion_list: Vec<Rc<str>> = vec![];
                for related in permutation {
                    self.deadline.tick()?;
                    if let Some(canon_id) = self.canonical.get(related) {
                        path.push_str("_:");
                        path.push_str(canon_id);
                    } else {
                        let (temp_id, new) = issuer_copy.issue(related);
                        if new {
                            recursion_list.push(Rc::clone(related));
                        }
                        path.push_str("_:");
                        path.push_str(&temp_id);
                    }
                    if !chosen_path.is_empty() && path > chosen_path {
                        return Ok(()); // prune: skip to the next permutation
                    }
                }
                for related in recursion_list {
                    self.deadline.tick()?;
                    let result = self.hash_n_degree_quads(&related, &issuer_copy)?;
                    let (temp_id, _) = issuer_copy.issue(&related);
                    path.push_str("_:");
                    path.push_str(&temp_id);
                    path.push('<');
                    path.push_str(&result.hash);
                    path.push('>');
                    issuer_copy = result.issuer;
                    if !chosen_path.is_empty() && path > chosen_path {
                        return Ok(()); // prune: skip to the next permutation
                    }
                }
                if chosen_path.is_empty() || path < chosen_path {
                    chosen_path = path;
                    chosen_issuer = Some(issuer_copy);
                }
                Ok(())
            })?;
            data_to_hash.push_str(&chosen_path);
            if let Some(chosen) = chosen_issuer {
                issuer = chosen;
            }
        }
        // Step 4: hash the concatenated groups and paths
        self.hasher.reset();
        self.hasher.update(&data_to_hash);
        let hash = self.hasher.hex_digest();
        debug_assert!({
            log::trace!("hash-n-degree({id})\n-> {hash}");
            true
        });
        Ok(NDegreeResult { hash, issuer })
    }
}

/// The outcome of one n-degree hash computation:
/// a digest and the issuer state produced while computing it.
/// Ordered by digest, which is how the canonical numbering of
/// formerly-symmetric blank nodes is decided.
struct NDegreeResult {
    hash: String,
    issuer: IdentifierIssuer,
}

impl PartialEq for NDegreeResult {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for NDegreeResult {}

impl PartialOrd for NDegreeResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NDegreeResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.hash.cmp(&other.hash)
    }
}

/// Implements <https://www.w3.org/TR/rdf-canon/#hash-1d-quads>
/// over the quad list referencing `bnid`:
/// one line per quad with `bnid` collapsed to `_:a`
/// and every other blank node to `_:z`,
/// lines sorted and concatenated, then hashed.
fn hash_first_degree_quads(
    bnid: &str,
    quads: &[&Quad],
    hasher: &mut Hasher,
    deadline: &mut Deadline,
) -> Result<String, C14nError> {
    let mut nquads: Vec<String> = Vec::with_capacity(quads.len());
    for quad in quads {
        deadline.tick()?;
        let mut line = String::new();
        nq_for_hash(&quad.s, &mut line, bnid);
        nq_for_hash(&quad.p, &mut line, bnid);
        nq_for_hash(&quad.o, &mut line, bnid);
        if let Some(gn) = &quad.g {
            nq_for_hash(gn, &mut line, bnid);
        }
        line.push_str(".\n");
        nquads.push(line);
    }
    nquads.sort_unstable();
    hasher.reset();
    for line in &nquads {
        hasher.update(line);
    }
    let digest = hasher.hex_digest();
    debug_assert!({
        log::trace!("hash-first-degree({bnid})\n-> {digest}");
        true
    });
    Ok(digest)
}

fn nq_for_hash(term: &Term, buffer: &mut String, ref_bnid: &str) {
    if let Some(bnid) = term.bnode_id() {
        if bnid == ref_bnid {
            buffer.push_str("_:a ");
        } else {
            buffer.push_str("_:z ");
        }
    } else {
        nq_term(term, buffer);
    }
}
