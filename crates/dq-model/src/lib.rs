//! Data model for data-quality detection and cleaning.
//!
//! Everything here is plain data: validated detector specifications, fitted
//! parameters, detection results and reports. The estimation and detection
//! logic lives in `dq-detect`; cleaning lives in `dq-clean`.

pub mod error;
pub mod fitted;
pub mod options;
pub mod persist;
pub mod report;
pub mod result;
pub mod schema;
pub mod spec;
pub mod value;

pub use error::{Error, Result};
pub use fitted::{
    Cluster, Combination, Estimate, FittedAssociations, FittedBounds, FittedClusters,
    FittedGroups, FittedRobust, FittedState, FittedTransform, FittedValues, PowerTransform,
};
pub use options::{
    CastTarget, Inclusive, Keep, MissingHow, MissingPolicy, NormalTestPolicy, PatternMode,
    Representative, Sided, SpaceSide, TransformChoice,
};
pub use persist::PersistedDetector;
pub use report::{ParamValue, Parameter, Report};
pub use result::{DetectionDetail, DetectionResult};
pub use schema::{Schema, SchemaColumn, ValueKind};
pub use spec::{
    AlternativesOptions, Arity, AssociationsOptions, BoundedOptions, ByCategoryOptions,
    CastableOptions, CellPredicate, CountsOptions, CustomOptions, DateRangeOptions, DetectorSpec,
    DuplicatedOptions, EmailOptions, EnumOptions, FreqOptions, GaussianOptions, LengthOptions,
    Method, MissingOptions, OutliersOptions, PatternOptions, QuantilesOptions, RowPredicate,
    SpacesOptions, UrlOptions, ValueOptions,
};
pub use value::Value;
