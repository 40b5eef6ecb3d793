//! Incident to document normalization.
//!
//! Pure functions only: no I/O, deterministic for a given input.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Incident, IncidentStatus, Postmortem};

/// Source tag stamped on every document produced here.
pub const SOURCE: &str = "pagerduty";

/// Metadata value marking a postmortem document.
pub const POSTMORTEM_DOCUMENT_TYPE: &str = "postmortem";

/// Normalized, storage-ready document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub metadata: BTreeMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

/// Map one incident to a document.
///
/// Metadata always carries `incident_id`, `status`, `urgency` and `service`;
/// `priority` is added when the incident has one and `assignee` when it has
/// at least one assignment.
#[must_use]
pub fn incident_to_document(incident: &Incident) -> Document {
    let mut metadata = BTreeMap::from([
        ("incident_id".to_string(), incident.id.clone()),
        ("status".to_string(), incident.status.as_str().to_string()),
        ("urgency".to_string(), incident.urgency.clone()),
        ("service".to_string(), incident.service.name.clone()),
    ]);

    if let Some(priority) = &incident.priority {
        metadata.insert("priority".to_string(), priority.name.clone());
    }

    if let Some(first) = incident.assignments.first() {
        metadata.insert("assignee".to_string(), first.assignee.name.clone());
    }

    Document {
        id: incident.id.clone(),
        content: join_content(&incident.summary, &incident.description),
        title: incident.summary.clone(),
        source: SOURCE.to_string(),
        url: incident.html_url.clone(),
        metadata,
        updated_at: incident.updated_at,
    }
}

/// Map the resolved incidents in `incidents` to postmortem documents.
#[must_use]
pub fn postmortem_documents(incidents: &[Incident]) -> Vec<Document> {
    incidents
        .iter()
        .filter(|incident| incident.status == IncidentStatus::Resolved)
        .map(|incident| {
            let mut doc = incident_to_document(incident);
            doc.metadata.insert(
                "document_type".to_string(),
                POSTMORTEM_DOCUMENT_TYPE.to_string(),
            );
            doc
        })
        .collect()
}

/// Map a postmortem record to a document.
///
/// None of the activities call this: they list incidents only. It is exported
/// for hosts that fetch postmortem records themselves and want them in the
/// same document shape.
#[must_use]
pub fn postmortem_to_document(postmortem: &Postmortem) -> Document {
    let metadata = BTreeMap::from([
        ("postmortem_id".to_string(), postmortem.id.clone()),
        (
            "document_type".to_string(),
            POSTMORTEM_DOCUMENT_TYPE.to_string(),
        ),
    ]);

    Document {
        id: postmortem.id.clone(),
        content: join_content(&postmortem.title, &postmortem.description),
        title: postmortem.title.clone(),
        source: SOURCE.to_string(),
        url: postmortem.html_url.clone(),
        metadata,
        updated_at: postmortem.updated_at,
    }
}

fn join_content(head: &str, body: &str) -> String {
    if body.is_empty() {
        head.to_string()
    } else {
        format!("{head}\n\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignee, Assignment, EscalationPolicy, Priority, Service};
    use chrono::TimeZone;

    fn incident(id: &str, status: IncidentStatus) -> Incident {
        Incident {
            id: id.to_string(),
            kind: "incident".to_string(),
            summary: format!("Incident {id}"),
            description: String::new(),
            status,
            urgency: "high".to_string(),
            priority: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            resolved_at: None,
            service: Service {
                id: "PSVC".to_string(),
                name: "Checkout".to_string(),
                summary: "Checkout".to_string(),
            },
            assignments: vec![],
            escalation_policy: EscalationPolicy::default(),
            html_url: format!("https://acme.pagerduty.com/incidents/{id}"),
        }
    }

    fn assignment(name: &str) -> Assignment {
        Assignment {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 1, 0).unwrap(),
            assignee: Assignee {
                id: format!("U-{name}"),
                name: name.to_string(),
                summary: name.to_string(),
            },
        }
    }

    #[test]
    fn test_content_joins_description() {
        let mut inc = incident("P1", IncidentStatus::Triggered);
        inc.description = "Checkout latency above 2s".to_string();
        let doc = incident_to_document(&inc);
        assert_eq!(doc.content, "Incident P1\n\nCheckout latency above 2s");
        assert_eq!(doc.title, "Incident P1");
    }

    #[test]
    fn test_content_without_description_has_no_separator() {
        let doc = incident_to_document(&incident("P1", IncidentStatus::Triggered));
        assert_eq!(doc.content, "Incident P1");
    }

    #[test]
    fn test_minimal_metadata() {
        let doc = incident_to_document(&incident("P1", IncidentStatus::Acknowledged));
        let keys: Vec<_> = doc.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, ["incident_id", "service", "status", "urgency"]);
        assert_eq!(doc.metadata["incident_id"], "P1");
        assert_eq!(doc.metadata["status"], "acknowledged");
        assert_eq!(doc.metadata["urgency"], "high");
        assert_eq!(doc.metadata["service"], "Checkout");
    }

    #[test]
    fn test_priority_and_first_assignee() {
        let mut inc = incident("P2", IncidentStatus::Triggered);
        inc.priority = Some(Priority {
            id: "PRI1".to_string(),
            name: "P1".to_string(),
            summary: "P1".to_string(),
        });
        inc.assignments = vec![assignment("Ada"), assignment("Grace")];

        let doc = incident_to_document(&inc);
        assert_eq!(doc.metadata.len(), 6);
        assert_eq!(doc.metadata["priority"], "P1");
        assert_eq!(doc.metadata["assignee"], "Ada");
    }

    #[test]
    fn test_document_fields_copied() {
        let inc = incident("P3", IncidentStatus::Resolved);
        let doc = incident_to_document(&inc);
        assert_eq!(doc.id, "P3");
        assert_eq!(doc.source, "pagerduty");
        assert_eq!(doc.url, "https://acme.pagerduty.com/incidents/P3");
        assert_eq!(doc.updated_at, inc.updated_at);
    }

    #[test]
    fn test_postmortems_keep_only_resolved() {
        let incidents = vec![
            incident("A", IncidentStatus::Triggered),
            incident("B", IncidentStatus::Acknowledged),
            incident("C", IncidentStatus::Resolved),
            incident("D", IncidentStatus::Resolved),
        ];

        let docs = postmortem_documents(&incidents);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "C");
        assert_eq!(docs[1].id, "D");
        for doc in &docs {
            assert_eq!(doc.metadata["document_type"], "postmortem");
        }
    }

    #[test]
    fn test_postmortems_ignore_unknown_status() {
        let incidents = vec![incident("X", IncidentStatus::Other("resolving".to_string()))];
        assert!(postmortem_documents(&incidents).is_empty());
    }

    #[test]
    fn test_postmortem_record_to_document() {
        let pm = Postmortem {
            id: "PM1".to_string(),
            kind: "postmortem".to_string(),
            title: "Checkout outage".to_string(),
            description: "Root cause: expired certificate".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap(),
            html_url: "https://acme.pagerduty.com/postmortems/PM1".to_string(),
        };

        let doc = postmortem_to_document(&pm);
        assert_eq!(doc.content, "Checkout outage\n\nRoot cause: expired certificate");
        assert_eq!(doc.metadata["document_type"], "postmortem");
        assert_eq!(doc.metadata["postmortem_id"], "PM1");
        assert_eq!(doc.source, SOURCE);
    }
}
