pub mod endpoints;
pub mod engine;
pub mod inspect;

pub use crate::domain::model::{BlendPayload, OutputMode, PayloadKind, RunReport, UploadedFile};
pub use crate::domain::ports::{BlendApi, ConfigProvider, Storage};
pub use crate::utils::error::Result;
