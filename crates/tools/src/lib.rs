//! Scripted sessions for the `linked` binary.

use coordinator::Coordinator;
use foundation::{Year, YearFilter};
use layers::{MapData, ScatterData};
use runtime::MetricsSnapshot;
use selection::{SelectionState, Transition};
use serde::Serialize;
use views::{ChoroplethView, DisplayList, ScatterView};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unrecognized event `{0}` (expected year=Y, year=all, focus=ID, clear or axes=X,Y)")]
    Unrecognized(String),

    #[error("invalid year in `{0}`")]
    BadYear(String),
}

/// Parses one `--event` argument.
pub fn parse_event(arg: &str) -> Result<Transition, ScriptError> {
    let arg = arg.trim();
    if arg == "clear" {
        return Ok(Transition::ClearFocus);
    }
    let Some((key, value)) = arg.split_once('=') else {
        return Err(ScriptError::Unrecognized(arg.to_string()));
    };
    let value = value.trim();
    match key.trim() {
        "year" if value == "all" => Ok(Transition::SelectAllYears),
        "year" => value
            .parse::<i32>()
            .map(|y| Transition::SelectYear(Year(y)))
            .map_err(|_| ScriptError::BadYear(arg.to_string())),
        "focus" if !value.is_empty() => Ok(Transition::focus(value)),
        "axes" => match value.split_once(',') {
            Some((x, y)) if !x.trim().is_empty() && !y.trim().is_empty() => {
                Ok(Transition::set_axes(x.trim(), y.trim()))
            }
            _ => Err(ScriptError::Unrecognized(arg.to_string())),
        },
        _ => Err(ScriptError::Unrecognized(arg.to_string())),
    }
}

/// Outcome of one scripted event.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub event: String,
    pub cycle: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

/// Everything printed at the end of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub state: SelectionState,
    pub year_label: String,
    pub steps: Vec<StepOutcome>,
    pub issues: Vec<String>,
    pub map: MapData,
    pub scatter: ScatterData,
    pub map_display: DisplayList,
    pub scatter_display: DisplayList,
    pub metrics: MetricsSnapshot,
}

/// Applies `events` in order. Rejected events are recorded and the session
/// continues with the last valid views.
pub fn run_script(
    session: &mut Coordinator<ChoroplethView, ScatterView>,
    events: &[(String, Transition)],
) -> Vec<StepOutcome> {
    events
        .iter()
        .map(|(label, transition)| {
            let rejected = session
                .dispatch(transition.clone())
                .err()
                .map(|e| e.to_string());
            StepOutcome {
                event: label.clone(),
                cycle: session.cycle().index,
                rejected,
            }
        })
        .collect()
}

pub fn report(
    session: &Coordinator<ChoroplethView, ScatterView>,
    steps: Vec<StepOutcome>,
) -> SessionReport {
    let year_label = match session.state().year {
        YearFilter::Specific(y) => y.to_string(),
        YearFilter::AllYears => "all years".to_string(),
    };
    SessionReport {
        state: session.state().clone(),
        year_label,
        steps,
        issues: session.store().issues().iter().map(|i| i.to_string()).collect(),
        map: session.map_data().clone(),
        scatter: session.scatter_data().clone(),
        map_display: session.map_view().display_list().clone(),
        scatter_display: session.scatter_view().display_list().clone(),
        metrics: session.metrics().snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptError, parse_event, report, run_script};
    use coordinator::{Coordinator, SessionConfig};
    use foundation::Year;
    use observations::{ObservationStore, RecordSchema, ingest::parse_records_json};
    use selection::Transition;
    use std::sync::Arc;
    use views::{ChoroplethView, ScatterView};

    #[test]
    fn parses_every_event_form() {
        assert_eq!(parse_event("year=2015"), Ok(Transition::SelectYear(Year(2015))));
        assert_eq!(parse_event(" year = all "), Ok(Transition::SelectAllYears));
        assert_eq!(parse_event("focus=NLD"), Ok(Transition::focus("NLD")));
        assert_eq!(parse_event("clear"), Ok(Transition::ClearFocus));
        assert_eq!(
            parse_event("axes=energy, pollution"),
            Ok(Transition::set_axes("energy", "pollution"))
        );
    }

    #[test]
    fn rejects_malformed_events() {
        assert_eq!(
            parse_event("year=soon"),
            Err(ScriptError::BadYear("year=soon".to_string()))
        );
        assert!(matches!(parse_event("axes=energy"), Err(ScriptError::Unrecognized(_))));
        assert!(matches!(parse_event("focus="), Err(ScriptError::Unrecognized(_))));
        assert!(matches!(parse_event("zoom=2"), Err(ScriptError::Unrecognized(_))));
    }

    #[test]
    fn script_records_rejections_and_continues() {
        let raw = parse_records_json(
            r#"[{"countries": "NLD", "year": 2014, "energy": 1, "pollution": 2},
                {"countries": "BEL", "year": 2015, "energy": 3, "pollution": "?"}]"#,
        )
        .unwrap();
        let store = ObservationStore::load(raw, &RecordSchema::new("countries", "year")).unwrap();
        let mut session = Coordinator::new(
            Arc::new(store),
            ChoroplethView::default(),
            ScatterView::new(),
            &SessionConfig::default(),
        )
        .unwrap();

        let events = vec![
            ("year=1990".to_string(), Transition::SelectYear(Year(1990))),
            ("year=2014".to_string(), Transition::SelectYear(Year(2014))),
        ];
        let steps = run_script(&mut session, &events);
        assert!(steps[0].rejected.is_some());
        assert_eq!(steps[0].cycle, 0);
        assert_eq!(steps[1].rejected, None);
        assert_eq!(steps[1].cycle, 1);

        let rep = report(&session, steps);
        assert_eq!(rep.year_label, "2014");
        assert_eq!(rep.issues.len(), 1);
        assert_eq!(rep.scatter.points.len(), 1);
    }

    #[test]
    fn replays_demo_assets() {
        let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
        let payload = std::fs::read_to_string(root.join("green_growth.json")).unwrap();
        let raw = parse_records_json(&payload).unwrap();
        let store = ObservationStore::load(raw, &RecordSchema::new("countries", "year")).unwrap();
        let config = SessionConfig::from_json_file(root.join("session.json")).unwrap();

        let mut session = Coordinator::new(
            Arc::new(store),
            ChoroplethView::default(),
            ScatterView::new(),
            &config,
        )
        .unwrap();
        // PRT has no expenditure for 2015.
        assert_eq!(session.scatter_data().excluded, 1);
        assert_eq!(session.map_data().cells.len(), 9);

        let events = vec![
            ("year=all".to_string(), parse_event("year=all").unwrap()),
            ("focus=NLD".to_string(), parse_event("focus=NLD").unwrap()),
        ];
        run_script(&mut session, &events);
        assert_eq!(session.scatter_data().points.len(), 5);
        assert!(
            session
                .scatter_data()
                .points
                .iter()
                .all(|p| p.entity.as_str() == "NLD")
        );
    }
}
