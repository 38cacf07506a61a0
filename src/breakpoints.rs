use rustc_hash::FxHashMap;
use tracing::{debug, error};

use crate::{
    remote::{BreakpointAction, BreakpointCandidate, BreakpointMode, RemoteError, Workunit},
    types::{Breakpoint, Source},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BreakpointRecord {
    pub id: usize,
    pub verified: bool,
    pub line: usize,
    /// The id the breakpoint is armed under in the engine, `<candidate id>_0`.
    pub location: String,
}

impl BreakpointRecord {
    pub fn to_breakpoint(&self, path: &str) -> Breakpoint {
        Breakpoint {
            id: Some(self.id),
            verified: self.verified,
            line: Some(self.line),
            source: Some(Source {
                path: Some(path.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// The first candidate at or after `line`, in the order the engine listed them.
pub fn snap<'a>(candidates: &'a [BreakpointCandidate], line: usize) -> Option<&'a BreakpointCandidate> {
    candidates.iter().find(|it| it.line >= line)
}

pub struct BreakpointManager {
    next_id: usize,
    by_source: FxHashMap<String, Vec<BreakpointRecord>>,
}

impl Default for BreakpointManager {
    fn default() -> Self {
        Self {
            next_id: 1000,
            by_source: FxHashMap::default(),
        }
    }
}

impl BreakpointManager {
    /// Replaces all breakpoints with the ones requested for `path`.
    ///
    /// The engine only knows one set of breakpoints per workunit, so breakpoints of other files
    /// are dropped as well. Lines without a valid location at or after them are left out.
    pub async fn set_breakpoints(
        &mut self,
        workunit: &dyn Workunit,
        path: &str,
        lines: &[usize],
    ) -> Result<Vec<BreakpointRecord>, RemoteError> {
        if !workunit.status().debugging {
            debug!("Not debugging, ignoring the breakpoints of `{path}`.");
            return Ok(vec![]);
        }

        workunit.breakpoints_clear().await?;
        self.by_source.clear();
        let candidates = workunit.breakpoints_valid(path).await?;

        let mut records = vec![];
        for &line in lines {
            let Some(candidate) = snap(&candidates, line) else {
                debug!("No breakpoint location at or after {path}:{line}.");
                continue;
            };
            let location = format!("{}_0", candidate.id);
            let verified = match workunit
                .breakpoint_add(&location, BreakpointMode::Edge, BreakpointAction::Break)
                .await
            {
                Ok(()) => true,
                Err(error) => {
                    error!("Failed to arm the breakpoint at `{location}`: {error}");
                    false
                }
            };
            records.push(BreakpointRecord {
                id: self.next_id,
                verified,
                line: candidate.line,
                location,
            });
            self.next_id += 1;
        }

        self.by_source.insert(path.to_string(), records.clone());
        Ok(records)
    }

    pub fn breakpoints_of(&self, path: &str) -> &[BreakpointRecord] {
        self.by_source.get(path).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeWorkunit;

    fn candidates() -> Vec<BreakpointCandidate> {
        [("1", 8), ("2", 12), ("3", 20)]
            .into_iter()
            .map(|(id, line)| BreakpointCandidate {
                id: id.to_string(),
                line,
            })
            .collect()
    }

    #[test]
    fn snaps_forward_to_the_next_candidate() {
        let candidates = candidates();
        assert_eq!(snap(&candidates, 10).map(|it| it.id.as_str()), Some("2"));
        assert_eq!(snap(&candidates, 12).map(|it| it.id.as_str()), Some("2"));
        assert_eq!(snap(&candidates, 1).map(|it| it.id.as_str()), Some("1"));
        assert_eq!(snap(&candidates, 25), None);
    }

    #[tokio::test]
    async fn arms_snapped_locations() {
        let workunit = FakeWorkunit::debugging("W1");
        workunit.state.lock().unwrap().candidates = candidates();
        let mut manager = BreakpointManager::default();

        let records = manager
            .set_breakpoints(workunit.as_ref(), "/src/hello.ecl", &[10, 25])
            .await
            .unwrap();
        assert_eq!(
            records,
            vec![BreakpointRecord {
                id: 1000,
                verified: true,
                line: 12,
                location: "2_0".to_string(),
            }],
        );
        assert_eq!(
            workunit.calls(),
            vec![
                "breakpoints_clear",
                "breakpoints_valid(/src/hello.ecl)",
                "breakpoint_add(2_0, edge, break)",
            ],
        );
        assert_eq!(manager.breakpoints_of("/src/hello.ecl"), records.as_slice());
    }

    #[tokio::test]
    async fn repeating_a_request_leaves_one_set_armed() {
        let workunit = FakeWorkunit::debugging("W1");
        workunit.state.lock().unwrap().candidates = candidates();
        let mut manager = BreakpointManager::default();

        let first = manager
            .set_breakpoints(workunit.as_ref(), "a.ecl", &[5, 10])
            .await
            .unwrap();
        let second = manager
            .set_breakpoints(workunit.as_ref(), "a.ecl", &[5, 10])
            .await
            .unwrap();

        let lines = |records: &[BreakpointRecord]| -> Vec<(bool, usize)> {
            records.iter().map(|it| (it.verified, it.line)).collect()
        };
        assert_eq!(lines(&first), lines(&second));
        assert_eq!(workunit.state.lock().unwrap().armed, vec!["1_0", "2_0"]);
    }

    #[tokio::test]
    async fn other_files_are_forgotten() {
        let workunit = FakeWorkunit::debugging("W1");
        workunit.state.lock().unwrap().candidates = candidates();
        let mut manager = BreakpointManager::default();

        manager.set_breakpoints(workunit.as_ref(), "a.ecl", &[5]).await.unwrap();
        manager.set_breakpoints(workunit.as_ref(), "b.ecl", &[15]).await.unwrap();
        assert!(manager.breakpoints_of("a.ecl").is_empty());
        assert_eq!(manager.breakpoints_of("b.ecl")[0].line, 20);
    }

    #[tokio::test]
    async fn does_nothing_unless_debugging() {
        let workunit = FakeWorkunit::debugging("W1");
        workunit.state.lock().unwrap().status.debugging = false;
        let mut manager = BreakpointManager::default();

        let records = manager
            .set_breakpoints(workunit.as_ref(), "a.ecl", &[5])
            .await
            .unwrap();
        assert!(records.is_empty());
        assert!(workunit.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_arming_is_reported_unverified() {
        let workunit = FakeWorkunit::debugging("W1");
        {
            let mut state = workunit.state.lock().unwrap();
            state.candidates = candidates();
            state.failing.push("breakpoint_add");
        }
        let mut manager = BreakpointManager::default();
        let records = manager
            .set_breakpoints(workunit.as_ref(), "a.ecl", &[10])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].verified);
    }
}
