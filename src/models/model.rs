//! Model records

use crate::decode::{fields, Record};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Kind of prediction a model makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Predicts a category
    Classifier,
    /// Predicts a number
    Regressor,
}

impl ModelType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Classifier => "classifier",
            ModelType::Regressor => "regressor",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMethod {
    /// Naive Bayes
    Bayes,
    /// Logistic regression
    Logistic,
    /// Linear regression
    Linear,
    /// Random forest
    Forest,
    /// Support vector machine
    Svm,
    /// Decision tree
    Tree,
    /// Multi-layer perceptron
    Mlp,
    /// XGBoost
    Xgb,
    /// Gradient boosting
    Gradient,
}

const CLASSIFIER_METHODS: &[ModelMethod] = &[
    ModelMethod::Bayes,
    ModelMethod::Logistic,
    ModelMethod::Forest,
    ModelMethod::Svm,
    ModelMethod::Tree,
    ModelMethod::Mlp,
    ModelMethod::Xgb,
    ModelMethod::Gradient,
];

const REGRESSOR_METHODS: &[ModelMethod] = &[
    ModelMethod::Linear,
    ModelMethod::Forest,
    ModelMethod::Svm,
    ModelMethod::Tree,
    ModelMethod::Mlp,
    ModelMethod::Xgb,
    ModelMethod::Gradient,
];

impl ModelMethod {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMethod::Bayes => "bayes",
            ModelMethod::Logistic => "logistic",
            ModelMethod::Linear => "linear",
            ModelMethod::Forest => "forest",
            ModelMethod::Svm => "svm",
            ModelMethod::Tree => "tree",
            ModelMethod::Mlp => "mlp",
            ModelMethod::Xgb => "xgb",
            ModelMethod::Gradient => "gradient",
        }
    }

    /// Methods the platform can train for a model type
    pub fn allowed_for(model_type: ModelType) -> &'static [ModelMethod] {
        match model_type {
            ModelType::Classifier => CLASSIFIER_METHODS,
            ModelType::Regressor => REGRESSOR_METHODS,
        }
    }

    /// Whether this method can train a model of the given type
    pub fn supports(&self, model_type: ModelType) -> bool {
        Self::allowed_for(model_type).contains(self)
    }
}

impl fmt::Display for ModelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let method = s.trim().to_lowercase();
        [CLASSIFIER_METHODS, REGRESSOR_METHODS]
            .concat()
            .into_iter()
            .find(|m| m.as_str() == method)
            .ok_or_else(|| Error::validation("MODEL_MISMATCH", format!("unknown model method '{s}'")))
    }
}

/// A model as returned by `workspace/{ws}/models/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model id
    #[serde(alias = "model_id")]
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub name: String,
    /// Free-text description
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub description: String,
    /// Prediction kind
    #[serde(rename = "type")]
    pub model_type: ModelType,
    /// Training algorithm
    pub method: ModelMethod,
    /// Creation date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Last access date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_access: Option<DateTime<Utc>>,
    /// Training source
    #[serde(rename = "source", alias = "source_id", default)]
    pub source_id: Option<String>,
    /// Storage used, in bytes
    #[serde(default, deserialize_with = "fields::count")]
    pub size_bytes: u64,
}

impl Record for ModelInfo {
    const KIND: &'static str = "model";
}

/// Payload for training a model
#[derive(Debug, Clone, PartialEq)]
pub struct NewModel {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Prediction kind
    pub model_type: ModelType,
    /// Training algorithm
    pub method: ModelMethod,
    /// Training source
    pub source_id: String,
    /// Name of the feature to predict
    pub target_feature: String,
    /// Advanced model configuration
    pub configuration: JsonValue,
    /// Share of rows held out for testing (0 to 1)
    pub test_size: f64,
    /// Shuffle rows before the test split
    pub shuffle: bool,
    /// Seed for the split
    pub random_state: f64,
    /// Hyper-parameter search configuration
    pub hyper_parameters: JsonValue,
}

impl NewModel {
    /// A model with default training configuration
    pub fn new(
        name: impl Into<String>,
        model_type: ModelType,
        method: ModelMethod,
        source_id: impl Into<String>,
        target_feature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model_type,
            method,
            source_id: source_id.into(),
            target_feature: target_feature.into(),
            configuration: json!({}),
            test_size: 0.3,
            shuffle: false,
            random_state: 0.0,
            hyper_parameters: json!({}),
        }
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the test split
    #[must_use]
    pub fn test_split(mut self, test_size: f64, shuffle: bool) -> Self {
        self.test_size = test_size;
        self.shuffle = shuffle;
        self
    }

    /// Check that the method can train this model type
    pub fn validate(&self) -> Result<()> {
        if self.method.supports(self.model_type) {
            return Ok(());
        }
        let allowed: Vec<&str> = ModelMethod::allowed_for(self.model_type)
            .iter()
            .map(ModelMethod::as_str)
            .collect();
        Err(Error::validation(
            "MODEL_MISMATCH",
            format!(
                "Provided model method ({}) doesn't match for model type {}. Allowed methods for provided type: {}",
                self.method,
                self.model_type,
                allowed.join(", ")
            ),
        ))
    }

    /// Request body, with the target resolved to its feature index
    pub fn to_body(&self, target_index: u64) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "type": self.model_type,
            "method": self.method,
            "source": self.source_id,
            "target": target_index,
            "configuration": self.configuration,
            "training_configuration": {
                "test_size": self.test_size,
                "shuffle": self.shuffle,
                "random_state": self.random_state,
            },
            "hyper_search_configuration": self.hyper_parameters,
        })
    }
}
