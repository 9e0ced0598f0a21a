//! Protected-set aware deletion of versions
//!
//! A version referenced by any pointer is never deleted. Bulk deletion is
//! best effort: every name is checked on its own and skips are recorded.

use serde::Serialize;

use super::{PointerManager, VersionStore};
use crate::domain::value_objects::VersionName;
use crate::error::{CutoverError, CutoverResult};

/// Why a version was not deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "reason", content = "detail")]
pub enum SkipReason {
    NotFound,
    Protected,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedVersion {
    pub name: VersionName,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of a bulk deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub deleted: Vec<VersionName>,
    pub skipped: Vec<SkippedVersion>,
}

impl DeletionReport {
    fn skip(&mut self, name: &VersionName, reason: SkipReason) {
        self.skipped.push(SkippedVersion {
            name: name.clone(),
            reason,
        });
    }
}

pub struct Retention<'s, 'a> {
    versions: &'s VersionStore<'a>,
    pointers: &'s PointerManager<'a>,
}

impl<'s, 'a> Retention<'s, 'a> {
    pub fn new(versions: &'s VersionStore<'a>, pointers: &'s PointerManager<'a>) -> Self {
        Self { versions, pointers }
    }

    /// Delete one version, refusing unknown and protected names
    pub fn delete_version(&self, name: &VersionName) -> CutoverResult<()> {
        if !self.versions.contains(name)? {
            return Err(CutoverError::VersionNotFound {
                name: name.to_string(),
            });
        }
        if self.pointers.protected_versions()?.contains(name) {
            return Err(CutoverError::ProtectedVersion {
                name: name.to_string(),
            });
        }
        self.versions.remove(name)
    }

    /// Delete each name independently; failures are recorded, not raised
    pub fn delete_versions(&self, names: &[VersionName]) -> CutoverResult<DeletionReport> {
        let existing = self.versions.list_versions()?;
        let protected = self.pointers.protected_versions()?;
        let mut report = DeletionReport::default();

        for name in names {
            if !existing.contains(name) {
                tracing::error!(version = %name, "not an available version");
                report.skip(name, SkipReason::NotFound);
                continue;
            }
            if protected.contains(name) {
                tracing::warn!(version = %name, "refusing to delete protected version");
                report.skip(name, SkipReason::Protected);
                continue;
            }
            match self.versions.remove(name) {
                Ok(()) => report.deleted.push(name.clone()),
                Err(e) => {
                    tracing::error!(version = %name, error = %e, "delete failed");
                    report.skip(name, SkipReason::Failed(e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Delete everything but the `keep` most recent versions
    pub fn delete_old_versions(&self, keep: usize) -> CutoverResult<DeletionReport> {
        let versions = self.versions.list_versions()?;
        if versions.len() <= keep {
            return Ok(DeletionReport::default());
        }
        let cut = versions.len() - keep;
        self.delete_versions(&versions[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Pointer;
    use crate::testing::LocalHost;

    fn names(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("django-202401{:02}-120000-aaaaaa-bbbbbb", i + 1))
            .collect()
    }

    fn host_with(versions: &[String], pointed: &str) -> LocalHost {
        let host = LocalHost::new();
        for v in versions {
            host.make_version(v);
        }
        for p in [
            "django-current",
            "django-previous",
            "django-working",
            "django-previous-working",
        ] {
            host.point(p, pointed);
        }
        host
    }

    #[test]
    fn delete_version_refuses_every_protected_version() {
        let all = names(5);
        let host = host_with(&all, &all[4]);
        host.point("django-previous", &all[3]);
        let config = host.config();
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, config.pointers.clone(), host.path(""));
        let retention = Retention::new(&store, &pointers);

        for v in pointers.protected_versions().unwrap() {
            let err = retention.delete_version(&v).unwrap_err();
            assert!(matches!(err, CutoverError::ProtectedVersion { .. }));
            assert!(host.has_entry(v.as_str()));
        }
    }

    #[test]
    fn delete_version_succeeds_exactly_once() {
        let all = names(3);
        let host = host_with(&all, &all[2]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);
        let victim = VersionName::from(all[0].as_str());

        retention.delete_version(&victim).unwrap();
        assert!(!store.list_versions().unwrap().contains(&victim));

        let err = retention.delete_version(&victim).unwrap_err();
        assert!(matches!(err, CutoverError::VersionNotFound { .. }));
    }

    #[test]
    fn delete_version_refuses_pointer_names() {
        let all = names(2);
        let host = host_with(&all, &all[1]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let err = retention
            .delete_version(&VersionName::from("django-current"))
            .unwrap_err();
        assert!(matches!(err, CutoverError::VersionNotFound { .. }));
        assert!(host.has_entry("django-current"));
    }

    #[test]
    fn delete_versions_continues_past_skips() {
        let all = names(4);
        let host = host_with(&all, &all[3]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let request = vec![
            VersionName::from("django-19990101-000000-zzzzzz-zzzzzz"),
            VersionName::from(all[3].as_str()),
            VersionName::from(all[0].as_str()),
            VersionName::from(all[1].as_str()),
        ];
        let report = retention.delete_versions(&request).unwrap();

        assert_eq!(
            report.deleted,
            vec![VersionName::from(all[0].as_str()), VersionName::from(all[1].as_str())]
        );
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].reason, SkipReason::NotFound);
        assert_eq!(report.skipped[1].reason, SkipReason::Protected);
    }

    #[test]
    fn delete_versions_records_remote_failures() {
        let all = names(3);
        let host = host_with(&all, &all[2]);
        host.fail_on(&format!("rm -rf '{}'", host.path(&all[0])));
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let report = retention
            .delete_versions(&[VersionName::from(all[0].as_str()), VersionName::from(all[1].as_str())])
            .unwrap();
        assert_eq!(report.deleted, vec![VersionName::from(all[1].as_str())]);
        assert!(matches!(report.skipped[0].reason, SkipReason::Failed(_)));
    }

    #[test]
    fn delete_old_versions_keeps_most_recent() {
        let all = names(8);
        let host = host_with(&all, &all[7]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let report = retention.delete_old_versions(3).unwrap();
        assert_eq!(report.deleted.len(), 5);
        let left: Vec<String> = store
            .list_versions()
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(left, all[5..].to_vec());
    }

    #[test]
    fn delete_old_versions_skips_protected_inside_window() {
        let all = names(5);
        let host = host_with(&all, &all[4]);
        host.point("django-previous", &all[0]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let report = retention.delete_old_versions(2).unwrap();
        assert_eq!(report.deleted.len(), 2);
        assert_eq!(report.skipped[0].name, all[0].as_str());
        assert_eq!(report.skipped[0].reason, SkipReason::Protected);
        assert_eq!(pointers.resolve(Pointer::Previous).unwrap(), all[0].as_str());
        assert_eq!(store.list_versions().unwrap().len(), 3);
    }

    #[test]
    fn delete_old_versions_nothing_to_do() {
        let all = names(2);
        let host = host_with(&all, &all[1]);
        let store = VersionStore::new(&host, host.path(""), "django");
        let pointers = PointerManager::new(&host, host.config().pointers, host.path(""));
        let retention = Retention::new(&store, &pointers);

        let report = retention.delete_old_versions(10).unwrap();
        assert_eq!(report, DeletionReport::default());
        assert!(!host.ran("rm -rf"));
    }
}
