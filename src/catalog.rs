//! Model catalog: the closed set of model identifiers per capability.
//!
//! Every capability has its own enum. Parsing a model string goes through
//! [`FromStr`], which fails with [`Error::ModelNotFound`] naming the valid
//! alternatives, so unknown models never reach the network.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Family of OxAPI endpoints. Used as the `{kind}` segment of the inference URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKind {
    Nlp,
}

impl ApiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKind::Nlp => "nlp",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category of model endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Classification,
    Completion,
    Encoding,
    Pipeline,
    Transformation,
}

impl Capability {
    pub const ALL: &'static [Capability] = &[
        Capability::Classification,
        Capability::Completion,
        Capability::Encoding,
        Capability::Pipeline,
        Capability::Transformation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Classification => "Classification",
            Capability::Completion => "Completion",
            Capability::Encoding => "Encoding",
            Capability::Pipeline => "Pipeline",
            Capability::Transformation => "Transformation",
        }
    }

    pub fn api_kind(&self) -> ApiKind {
        ApiKind::Nlp
    }

    /// Model identifiers accepted by this capability.
    pub fn list_models(&self) -> Vec<&'static str> {
        match self {
            Capability::Classification => ClassificationModel::list(),
            Capability::Completion => CompletionModel::list(),
            Capability::Encoding => EncodingModel::list(),
            Capability::Pipeline => PipelineModel::list(),
            Capability::Transformation => TransformationModel::list(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! model_catalog {
    (
        $(#[$meta:meta])*
        $name:ident => $capability:expr,
        { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn list() -> Vec<&'static str> {
                Self::ALL.iter().map(|m| m.as_str()).collect()
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.as_str() == s)
                    .ok_or_else(|| Error::model_not_found($capability, s, Self::list()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

model_catalog! {
    /// Classification models.
    ClassificationModel => Capability::Classification,
    {
        DialogContentFilter => "dialog-content-filter",
        DialogTopics => "dialog-topics",
        DialogEmotions => "dialog-emotions",
        DialogTag => "dialog-tag",
    }
}

model_catalog! {
    /// Completion models.
    CompletionModel => Capability::Completion,
    {
        GptNeo27b => "gpt-neo-2-7b",
        GptJ6b => "gpt-j-6b",
    }
}

model_catalog! {
    /// Encoding (sentence embedding) models.
    EncodingModel => Capability::Encoding,
    {
        AllMpnetBaseV2 => "all-mpnet-base-v2",
        AllMiniLmL6V2 => "all-minilm-l6-v2",
    }
}

model_catalog! {
    /// Pipeline models.
    PipelineModel => Capability::Pipeline,
    {
        EnCoreWebLg => "en-core-web-lg",
    }
}

model_catalog! {
    /// Transformation models.
    TransformationModel => Capability::Transformation,
    {
        PunctuationImputation => "punctuation-imputation",
    }
}

impl ClassificationModel {
    /// Output columns of each result row.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            ClassificationModel::DialogContentFilter | ClassificationModel::DialogTag => {
                &["label", "confidence_score"]
            }
            ClassificationModel::DialogEmotions => &[
                "original_label",
                "ekman_label",
                "group_label",
                "confidence_score",
            ],
            ClassificationModel::DialogTopics => &["label"],
        }
    }

    /// Topic models classify all input texts as one joined document.
    pub fn joins_inputs(&self) -> bool {
        matches!(self, ClassificationModel::DialogTopics)
    }
}

/// A validated model, tagged with its capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Classification(ClassificationModel),
    Completion(CompletionModel),
    Encoding(EncodingModel),
    Pipeline(PipelineModel),
    Transformation(TransformationModel),
}

impl Model {
    /// Validate `model` against the catalog of `capability`.
    pub fn parse(capability: Capability, model: &str) -> Result<Self> {
        Ok(match capability {
            Capability::Classification => Model::Classification(model.parse()?),
            Capability::Completion => Model::Completion(model.parse()?),
            Capability::Encoding => Model::Encoding(model.parse()?),
            Capability::Pipeline => Model::Pipeline(model.parse()?),
            Capability::Transformation => Model::Transformation(model.parse()?),
        })
    }

    pub fn capability(&self) -> Capability {
        match self {
            Model::Classification(_) => Capability::Classification,
            Model::Completion(_) => Capability::Completion,
            Model::Encoding(_) => Capability::Encoding,
            Model::Pipeline(_) => Capability::Pipeline,
            Model::Transformation(_) => Capability::Transformation,
        }
    }

    pub fn api_kind(&self) -> ApiKind {
        self.capability().api_kind()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Classification(m) => m.as_str(),
            Model::Completion(m) => m.as_str(),
            Model::Encoding(m) => m.as_str(),
            Model::Pipeline(m) => m.as_str(),
            Model::Transformation(m) => m.as_str(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClassificationModel> for Model {
    fn from(m: ClassificationModel) -> Self {
        Model::Classification(m)
    }
}

impl From<CompletionModel> for Model {
    fn from(m: CompletionModel) -> Self {
        Model::Completion(m)
    }
}

impl From<EncodingModel> for Model {
    fn from(m: EncodingModel) -> Self {
        Model::Encoding(m)
    }
}

impl From<PipelineModel> for Model {
    fn from(m: PipelineModel) -> Self {
        Model::Pipeline(m)
    }
}

impl From<TransformationModel> for Model {
    fn from(m: TransformationModel) -> Self {
        Model::Transformation(m)
    }
}
