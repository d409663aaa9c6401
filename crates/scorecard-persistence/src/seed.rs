//! Default plan contents: the four perspectives and the starter initiatives.
//!
//! Seeding is idempotent. Perspectives are matched by name and initiatives
//! by code, so running it against a partially seeded store only fills gaps.

use tracing::info;

use scorecard_models::{NewInitiative, Perspective, Priority};

use crate::error::Result;
use crate::store::PlanStore;

struct PerspectiveSeed {
    name: &'static str,
    color_bg: &'static str,
    color_bar: &'static str,
    color_header: &'static str,
    initiatives: &'static [(&'static str, &'static str, &'static str)],
}

const PERSPECTIVES: [PerspectiveSeed; 4] = [
    PerspectiveSeed {
        name: "Financial",
        color_bg: "#dbeafe",
        color_bar: "#3b82f6",
        color_header: "#1e40af",
        initiatives: &[
            ("F1", "License usage audit", "Conduct comprehensive audit of software license usage"),
            ("F2", "Real-time license monitoring system", "Implement system to monitor license usage in real-time"),
            ("F3", "Open-source alternatives assessment", "Evaluate open-source alternatives to proprietary software"),
            ("F4", "Pilot testing open-source solutions", "Test selected open-source solutions in controlled environment"),
            ("F5", "Migration roadmap development", "Develop roadmap for migrating to open-source solutions"),
            ("F6", "Staff training on open-source tools", "Train staff on using open-source tools"),
        ],
    },
    PerspectiveSeed {
        name: "Customer",
        color_bg: "#dcfce7",
        color_bar: "#22c55e",
        color_header: "#166534",
        initiatives: &[
            ("C1", "Project/task management system", "Implement project and task management system"),
            ("C2", "Extend CMMS functionality", "Extend Computerized Maintenance Management System features"),
            ("C3", "Extend PMS functionality", "Extend Property Management System features"),
            ("C4", "Boatyard Management System (ERD)", "Develop Entity Relationship Diagram for Boatyard Management System"),
            ("C5", "Digitize historical records (CS)", "Digitize historical records for Customer Service"),
            ("C6", "Digitalize board paper submission (CS)", "Digitalize board paper submission process for Customer Service"),
            ("C7", "Implement Retail module (TD)", "Implement Retail module for Trade Division"),
            ("C8", "Implement CRM module (TD)", "Implement Customer Relationship Management module for Trade Division"),
            ("C9", "Helpdesk KPIs and metrics", "Define and track helpdesk KPIs and metrics"),
            ("C10", "AI chatbots for support", "Implement AI-powered chatbots for customer support"),
            ("C11", "Cybersecurity awareness training", "Provide cybersecurity awareness training to customers"),
        ],
    },
    PerspectiveSeed {
        name: "Internal Process",
        color_bg: "#fef3c7",
        color_bar: "#f59e0b",
        color_header: "#b45309",
        initiatives: &[
            ("I1", "Define SLAs for critical services", "Define Service Level Agreements for critical ICT services"),
            ("I2", "SLA monitoring and reporting tools", "Implement tools for monitoring and reporting SLA performance"),
            ("I3", "Regular SLA performance reviews", "Establish regular review process for SLA performance"),
            ("I4", "Corrective measures for SLA issues", "Develop process for corrective measures when SLA issues occur"),
            ("I5", "ICT staff SLA management training", "Train ICT staff on SLA management"),
            ("I6", "Map IT processes and identify gaps", "Map existing IT processes and identify gaps"),
            ("I7", "Standardized workflows documentation", "Document standardized workflows"),
        ],
    },
    PerspectiveSeed {
        name: "Organization",
        color_bg: "#f3e8ff",
        color_bar: "#a855f7",
        color_header: "#7c3aed",
        initiatives: &[
            ("O1", "Technical workshops/knowledge sharing", "Organize technical workshops and knowledge sharing sessions"),
            ("O2", "Certification incentives program", "Establish certification incentives program for staff"),
            ("O3", "Pilot emerging technologies", "Pilot emerging technologies to evaluate potential"),
            ("O4", "Innovation lab/sandbox environment", "Set up innovation lab and sandbox environment"),
            ("O5", "Innovation brainstorming sessions", "Conduct innovation brainstorming sessions"),
            ("O6", "Reward technology adoption success", "Establish rewards for successful technology adoption"),
        ],
    },
];

/// What a seeding run added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub perspectives: usize,
    pub initiatives: usize,
}

/// Fills `store` with the default perspectives and initiatives.
pub fn seed_defaults(store: &PlanStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let existing_perspectives = store.gantt_data()?.len();
    let existing_codes: Vec<String> = store
        .list_initiatives()?
        .into_iter()
        .map(|i| i.initiative.code.to_uppercase())
        .collect();

    let mut display_order = 1;
    for (index, seed) in PERSPECTIVES.iter().enumerate() {
        let perspective_id = store.ensure_perspective(Perspective::new(
            seed.name,
            seed.color_bg,
            seed.color_bar,
            seed.color_header,
            index as i32 + 1,
        ))?;

        for (code, name, description) in seed.initiatives {
            let order = display_order;
            display_order += 1;
            if existing_codes.iter().any(|c| c == code) {
                continue;
            }
            store.create_initiative(NewInitiative {
                code: code.to_string(),
                name: name.to_string(),
                perspective_id: perspective_id.clone(),
                description: Some(description.to_string()),
                target_kpi: None,
                estimated_effort: None,
                priority: Some(Priority::Medium),
                display_order: order,
                team_ids: Vec::new(),
            })?;
            report.initiatives += 1;
        }
    }
    report.perspectives = store.gantt_data()?.len() - existing_perspectives;

    info!(
        perspectives = report.perspectives,
        initiatives = report.initiatives,
        "seeded plan"
    );
    Ok(report)
}
