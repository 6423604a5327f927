//! Demo data for local development (`safetrack seed`).

use chrono::{Duration, Utc};
use safetrack_core::{
  incident::NewIncident,
  store::{IncidentChanges, IncidentStore},
};

struct DemoIncident {
  location:          &'static str,
  category:          &'static str,
  severity:          &'static str,
  description:       &'static str,
  status:            &'static str,
  reported_by:       &'static str,
  /// Backdated `resolved_at` for incidents seeded as already resolved.
  resolved_days_ago: Option<i64>,
}

impl DemoIncident {
  fn to_new(&self) -> NewIncident {
    NewIncident {
      status: self.status.to_owned(),
      reported_by: Some(self.reported_by.to_owned()),
      ..NewIncident::new(self.location, self.category, self.severity, self.description)
    }
  }
}

const DEMO_INCIDENTS: &[DemoIncident] = &[
  DemoIncident {
    location:          "Rolling Mill",
    category:          "Mechanical",
    severity:          "High",
    description:       "Conveyor motor overheating; shutdown initiated.",
    status:            "Open",
    reported_by:       "Operator A",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Blast Furnace",
    category:          "Chemical",
    severity:          "Medium",
    description:       "Minor gas leak detected near valve assembly.",
    status:            "Investigating",
    reported_by:       "Safety Lead",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Scrap Yard",
    category:          "Slip/Trip/Fall",
    severity:          "Low",
    description:       "Oil residue near forklift lane; slip hazard.",
    status:            "Open",
    reported_by:       "Yard Supervisor",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Shipping Dock",
    category:          "Mechanical",
    severity:          "Medium",
    description:       "Dock leveler hydraulics sluggish during lift cycle.",
    status:            "Investigating",
    reported_by:       "Dock Foreman",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Rolling Mill",
    category:          "Electrical",
    severity:          "High",
    description:       "Panel breaker tripped; arc flash marks observed.",
    status:            "Resolved",
    reported_by:       "Maintenance Tech",
    resolved_days_ago: Some(2),
  },
  DemoIncident {
    location:          "Blast Furnace",
    category:          "Mechanical",
    severity:          "Medium",
    description:       "Vibration anomaly on blower unit; monitoring required.",
    status:            "Open",
    reported_by:       "Shift Engineer",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Shipping Dock",
    category:          "Slip/Trip/Fall",
    severity:          "Low",
    description:       "Loose cable covers in loading bay.",
    status:            "Resolved",
    reported_by:       "Warehouse Lead",
    resolved_days_ago: Some(1),
  },
  DemoIncident {
    location:          "Scrap Yard",
    category:          "Chemical",
    severity:          "High",
    description:       "Unknown drum leak; hazmat team notified.",
    status:            "Investigating",
    reported_by:       "Hazmat Coordinator",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Rolling Mill",
    category:          "Mechanical",
    severity:          "Medium",
    description:       "Guard rail loosened near rolling stand.",
    status:            "Open",
    reported_by:       "Line Supervisor",
    resolved_days_ago: None,
  },
  DemoIncident {
    location:          "Blast Furnace",
    category:          "Electrical",
    severity:          "Low",
    description:       "Flickering status lights on control panel.",
    status:            "Resolved",
    reported_by:       "Control Room",
    resolved_days_ago: Some(3),
  },
];

/// Insert the demo incidents and return how many were written.
///
/// Resolved demo rows get a backdated `resolved_at` through a follow-up
/// store update, since inserts never carry one.
///
/// Each insert and update is its own store write; nothing wraps the run in
/// a transaction. On error the rows written so far stay in the store, so
/// re-running after a failure duplicates them.
pub async fn seed<S: IncidentStore>(store: &S) -> Result<usize, S::Error> {
  let now = Utc::now();

  for demo in DEMO_INCIDENTS {
    let incident = store.insert(demo.to_new()).await?;
    if let Some(days) = demo.resolved_days_ago {
      let changes = IncidentChanges {
        resolved_at: Some(Some(now - Duration::days(days))),
        ..Default::default()
      };
      store.update(incident.id, changes).await?;
    }
  }

  tracing::info!(count = DEMO_INCIDENTS.len(), "seeded demo incidents");
  Ok(DEMO_INCIDENTS.len())
}
