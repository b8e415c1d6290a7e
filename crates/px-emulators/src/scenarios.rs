// SPDX-License-Identifier: BUSL-1.1
//! `x-ms-test` scenario selection.
//!
//! The payment experience service forwards the caller's `x-ms-test` header
//! to every downstream call. Its `scenarios` field names canned responses
//! registered here; the built-in set is loaded from `scenarios.yaml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EmulatorError;
use crate::mock_service::{pattern_matches, EmulatedResponse, RecordedRequest};
use crate::service::EmulatedService;

const BUILTIN: &str = include_str!("scenarios.yaml");

pub const TEST_HEADER: &str = "x-ms-test";

/// Parsed `x-ms-test` header: `{"scenarios":"a,b","contact":"..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestHeader {
    #[serde(default)]
    pub scenarios: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl TestHeader {
    pub fn new(scenarios: &[&str], contact: &str) -> Self {
        Self {
            scenarios: scenarios.join(","),
            contact: Some(contact.to_string()),
        }
    }

    /// Parse the header value. Malformed values select nothing.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed x-ms-test header");
            Self::default()
        })
    }

    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn to_header_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn default_status() -> u16 {
    200
}

/// One canned answer: `name` answers requests to `service` matching
/// `method` and `url_pattern`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub service: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url_pattern: Option<String>,
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: Value,
}

impl Scenario {
    fn answers(&self, request: &RecordedRequest) -> bool {
        let method_ok = self
            .method
            .as_deref()
            .map_or(true, |m| m.eq_ignore_ascii_case(&request.method));
        let url_ok = self
            .url_pattern
            .as_deref()
            .map_or(true, |p| pattern_matches(p, &request.path_and_query()));
        method_ok && url_ok
    }
}

/// How the selected scenarios answered a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    Unmatched,
    Answered {
        scenario: String,
        response: EmulatedResponse,
    },
    /// More than one selected scenario answered.
    Conflict(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    entries: Vec<(EmulatedService, Scenario)>,
}

impl ScenarioRegistry {
    /// The scenarios shipped with the emulators.
    pub fn builtin() -> Result<Self, EmulatorError> {
        Self::from_yaml(BUILTIN)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, EmulatorError> {
        let scenarios: Vec<Scenario> = serde_yaml::from_str(yaml)?;
        let mut registry = Self::default();
        for scenario in scenarios {
            registry.register(scenario)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, scenario: Scenario) -> Result<(), EmulatorError> {
        let service = EmulatedService::from_path(&scenario.service).ok_or_else(|| {
            EmulatorError::UnknownService {
                scenario: scenario.name.clone(),
                service: scenario.service.clone(),
            }
        })?;
        self.entries.push((service, scenario));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the request against the selected scenario names. Within one
    /// scenario the first matching entry answers.
    pub fn resolve(
        &self,
        service: EmulatedService,
        selected: &[String],
        request: &RecordedRequest,
    ) -> ScenarioOutcome {
        let mut answers: Vec<&Scenario> = Vec::new();
        for (svc, scenario) in &self.entries {
            if *svc != service
                || !selected.iter().any(|s| s.eq_ignore_ascii_case(&scenario.name))
                || answers.iter().any(|a| a.name.eq_ignore_ascii_case(&scenario.name))
            {
                continue;
            }
            if scenario.answers(request) {
                answers.push(scenario);
            }
        }

        match answers.as_slice() {
            [] => ScenarioOutcome::Unmatched,
            [one] => ScenarioOutcome::Answered {
                scenario: one.name.clone(),
                response: EmulatedResponse::json(one.status, one.body.clone()),
            },
            many => ScenarioOutcome::Conflict(many.iter().map(|s| s.name.clone()).collect()),
        }
    }
}
