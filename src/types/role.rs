//! Expertise roles
//!
//! The closed set of professional roles a conversation can be scoped to.
//! "General AI" is only available to authenticated users.

use serde::{Deserialize, Serialize};

/// A professional expertise context that scopes AI prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpertRole {
    Operations,
    Maintenance,
    ProjectManagement,
    SalesMarketing,
    Procurement,
    ErectionCommissioning,
    EngineeringDesign,
    /// Unscoped assistant, unlocked for authenticated sessions only
    GeneralAi,
}

impl ExpertRole {
    /// Every selectable role, in display order
    pub fn all() -> &'static [ExpertRole] {
        &[
            ExpertRole::Operations,
            ExpertRole::Maintenance,
            ExpertRole::ProjectManagement,
            ExpertRole::SalesMarketing,
            ExpertRole::Procurement,
            ExpertRole::ErectionCommissioning,
            ExpertRole::EngineeringDesign,
            ExpertRole::GeneralAi,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertRole::Operations => "operations",
            ExpertRole::Maintenance => "maintenance",
            ExpertRole::ProjectManagement => "project_management",
            ExpertRole::SalesMarketing => "sales_marketing",
            ExpertRole::Procurement => "procurement",
            ExpertRole::ErectionCommissioning => "erection_commissioning",
            ExpertRole::EngineeringDesign => "engineering_design",
            ExpertRole::GeneralAi => "general_ai",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "operations" => Some(ExpertRole::Operations),
            "maintenance" => Some(ExpertRole::Maintenance),
            "project_management" => Some(ExpertRole::ProjectManagement),
            "sales_marketing" => Some(ExpertRole::SalesMarketing),
            "procurement" => Some(ExpertRole::Procurement),
            "erection_commissioning" => Some(ExpertRole::ErectionCommissioning),
            "engineering_design" => Some(ExpertRole::EngineeringDesign),
            "general_ai" => Some(ExpertRole::GeneralAi),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExpertRole::Operations => "Operations",
            ExpertRole::Maintenance => "Maintenance",
            ExpertRole::ProjectManagement => "Project Management",
            ExpertRole::SalesMarketing => "Sales & Marketing",
            ExpertRole::Procurement => "Procurement",
            ExpertRole::ErectionCommissioning => "Erection & Commissioning",
            ExpertRole::EngineeringDesign => "Engineering & Design",
            ExpertRole::GeneralAi => "General AI",
        }
    }

    /// Whether selecting this role requires an authenticated session
    pub fn requires_auth(&self) -> bool {
        matches!(self, ExpertRole::GeneralAi)
    }

    /// System prompt preamble sent ahead of every request in this role
    pub fn system_prompt(&self) -> &'static str {
        match self {
            ExpertRole::Operations => {
                "You are a senior cement plant operations engineer. Answer questions about \
                 kiln and mill operation, process parameters, clinker quality and day-to-day \
                 plant running. Be practical and concise."
            }
            ExpertRole::Maintenance => {
                "You are a cement plant maintenance specialist. Answer questions about \
                 mechanical and electrical upkeep, preventive maintenance schedules, \
                 breakdown diagnosis and spare parts strategy."
            }
            ExpertRole::ProjectManagement => {
                "You are a project manager for industrial plant projects. Answer questions \
                 about planning, scheduling, budgeting, contractor coordination and risk \
                 management."
            }
            ExpertRole::SalesMarketing => {
                "You are a sales and marketing expert for the cement industry. Answer \
                 questions about markets, customers, pricing and product positioning."
            }
            ExpertRole::Procurement => {
                "You are a procurement specialist for industrial plants. Answer questions \
                 about sourcing, vendor evaluation, purchase contracts and logistics."
            }
            ExpertRole::ErectionCommissioning => {
                "You are an erection and commissioning engineer for cement plants. Answer \
                 questions about equipment installation, alignment, cold and hot \
                 commissioning and performance testing."
            }
            ExpertRole::EngineeringDesign => {
                "You are a plant engineering and design expert. Answer questions about \
                 process design, equipment sizing, layouts and engineering standards."
            }
            ExpertRole::GeneralAi => {
                "You are a helpful general-purpose AI assistant. Answer clearly and \
                 accurately on any topic."
            }
        }
    }
}
