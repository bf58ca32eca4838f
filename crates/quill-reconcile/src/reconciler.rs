// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local/remote reference reconciliation.

use std::sync::Arc;

use quill_core::{QuillError, Reference, ReferenceStore};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::citation::with_citation;
use crate::normalize::normalize_doi;
use crate::similarity::is_same_work;
use crate::validation::validate;

/// The first field found to differ between matched records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ConflictReason {
    #[serde(rename = "Different year")]
    #[strum(serialize = "Different year")]
    DifferentYear,
    #[serde(rename = "Different source")]
    #[strum(serialize = "Different source")]
    DifferentSource,
    #[serde(rename = "Different DOI")]
    #[strum(serialize = "Different DOI")]
    DifferentDoi,
}

/// A local record and the remote record it matched, which disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub local: Reference,
    pub remote: Reference,
    pub reason: ConflictReason,
}

/// How an operator resolves a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResolveStrategy {
    UseLocal,
    UseRemote,
    Merge,
}

/// Outcome of [`Reconciler::reconcile`] or [`Reconciler::sync`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub imported: Vec<Reference>,
    pub exported: Vec<Reference>,
    pub conflicts: Vec<ConflictRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconciliationResult {
    fn offline(err: &QuillError) -> Self {
        let error = match err {
            QuillError::RemoteStoreUnreachable { .. } => err.to_string(),
            other => QuillError::RemoteStoreUnreachable {
                message: other.to_string(),
            }
            .to_string(),
        };
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// The I/O-free half of reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Remote records no local matched, with citations filled in.
    pub imports: Vec<Reference>,
    /// Valid local records with no remote counterpart.
    pub export_candidates: Vec<Reference>,
    pub conflicts: Vec<ConflictRecord>,
    /// Local records whose remote match agrees on every compared field.
    pub synchronized: Vec<Reference>,
}

/// Sort `local` and `remote` into imports, exports, conflicts and matches.
///
/// Invalid locals are dropped. Each valid local takes the first remote it
/// matches; a remote may be matched by more than one local.
pub fn classify(local: &[Reference], remote: &[Reference]) -> Partition {
    let mut matched = vec![false; remote.len()];
    let mut partition = Partition::default();

    for candidate in local {
        if let Err(reason) = validate(candidate) {
            debug!(title = %candidate.title, ?reason, "skipping invalid local reference");
            continue;
        }

        match remote.iter().position(|r| is_same_work(candidate, r)) {
            Some(idx) => {
                matched[idx] = true;
                let other = &remote[idx];
                match compare(candidate, other) {
                    Some(reason) => partition.conflicts.push(ConflictRecord {
                        local: candidate.clone(),
                        remote: other.clone(),
                        reason,
                    }),
                    None => partition.synchronized.push(candidate.clone()),
                }
            }
            None => partition.export_candidates.push(candidate.clone()),
        }
    }

    partition.imports = remote
        .iter()
        .zip(&matched)
        .filter(|(_, m)| !**m)
        .map(|(r, _)| with_citation(r.clone()))
        .collect();
    partition
}

/// Year, then source, then DOI when both sides carry one.
fn compare(local: &Reference, remote: &Reference) -> Option<ConflictReason> {
    if local.year != remote.year {
        return Some(ConflictReason::DifferentYear);
    }
    if !local.source.trim().eq_ignore_ascii_case(remote.source.trim()) {
        return Some(ConflictReason::DifferentSource);
    }
    match (&local.doi, &remote.doi) {
        (Some(a), Some(b)) if normalize_doi(a) != normalize_doi(b) => {
            Some(ConflictReason::DifferentDoi)
        }
        _ => None,
    }
}

/// Reconciles local references against an optional remote store.
///
/// Without a store, reconciliation still classifies but cannot export, and
/// `sync` always reports offline mode.
#[derive(Clone, Default)]
pub struct Reconciler {
    store: Option<Arc<dyn ReferenceStore>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A reconciler with no remote store configured.
    pub fn offline() -> Self {
        Self { store: None }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Fetch the remote library, then reconcile against it.
    pub async fn sync(&self, local: &[Reference]) -> ReconciliationResult {
        let Some(store) = &self.store else {
            warn!("no remote store configured, operating in offline mode");
            return ReconciliationResult::offline(&QuillError::RemoteStoreUnreachable {
                message: "no remote reference store configured".to_string(),
            });
        };

        match store.list().await {
            Ok(remote) => self.reconcile(local, &remote).await,
            Err(err) => {
                warn!(store = store.name(), error = %err, "remote store unreachable");
                ReconciliationResult::offline(&err)
            }
        }
    }

    /// Classify, then create every export candidate on the remote store.
    ///
    /// A failed create is logged and the reference is left out of
    /// `exported`; it never fails the whole reconciliation.
    pub async fn reconcile(&self, local: &[Reference], remote: &[Reference]) -> ReconciliationResult {
        let partition = classify(local, remote);
        let mut result = ReconciliationResult {
            imported: partition.imports,
            conflicts: partition.conflicts,
            ..ReconciliationResult::default()
        };

        match &self.store {
            Some(store) => {
                for candidate in partition.export_candidates {
                    match store.create(&candidate).await {
                        Ok(key) => result.exported.push(candidate.with_external_key(key)),
                        Err(err) => {
                            let err = QuillError::RemoteCreateFailed {
                                title: candidate.title.clone(),
                                message: err.to_string(),
                            };
                            warn!(store = store.name(), title = %candidate.title, error = %err, "export failed, skipping reference");
                        }
                    }
                }
            }
            None if !partition.export_candidates.is_empty() => {
                warn!(
                    pending = partition.export_candidates.len(),
                    "no remote store configured, references not exported"
                );
                result.error = Some(
                    QuillError::RemoteStoreUnreachable {
                        message: "no remote reference store configured".to_string(),
                    }
                    .to_string(),
                );
            }
            None => {}
        }

        info!(
            imported = result.imported.len(),
            exported = result.exported.len(),
            conflicts = result.conflicts.len(),
            synchronized = partition.synchronized.len(),
            "reconciliation complete"
        );
        result
    }

    /// Apply an operator's choice for one conflict.
    ///
    /// `UseLocal` and `Merge` write the chosen record to the remote store
    /// under the remote record's key; `UseRemote` makes no store call.
    pub async fn resolve_conflict(
        &self,
        conflict: &ConflictRecord,
        strategy: ResolveStrategy,
    ) -> Result<Reference, QuillError> {
        let resolved = match strategy {
            ResolveStrategy::UseRemote => return Ok(conflict.remote.clone()),
            ResolveStrategy::UseLocal => conflict.local.clone(),
            ResolveStrategy::Merge => merge(&conflict.local, &conflict.remote),
        };

        let key = conflict.remote.external_key.clone().ok_or_else(|| {
            QuillError::InvalidInput(format!(
                "remote record `{}` has no external key",
                conflict.remote.title
            ))
        })?;
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| QuillError::RemoteStoreUnreachable {
                message: "no remote reference store configured".to_string(),
            })?;

        let resolved = resolved.with_external_key(key.clone());
        store.update(&key, &resolved).await?;
        info!(store = store.name(), key = %key, %strategy, "conflict resolved");
        Ok(resolved)
    }
}

/// Remote wins for bibliographic fields it has; the citation stays local.
pub fn merge(local: &Reference, remote: &Reference) -> Reference {
    Reference {
        title: if remote.title.trim().is_empty() {
            local.title.clone()
        } else {
            remote.title.clone()
        },
        authors: if remote.authors.is_empty() {
            local.authors.clone()
        } else {
            remote.authors.clone()
        },
        year: remote.year.or(local.year),
        source: if remote.source.trim().is_empty() {
            local.source.clone()
        } else {
            remote.source.clone()
        },
        doi: remote.doi.clone().or_else(|| local.doi.clone()),
        abstract_text: remote
            .abstract_text
            .clone()
            .or_else(|| local.abstract_text.clone()),
        url: remote.url.clone().or_else(|| local.url.clone()),
        citation: local.citation.clone(),
        external_key: remote.external_key.clone(),
    }
}
