#![forbid(unsafe_code)]

pub mod ai_generator;
pub mod api_client;
pub mod app_services;
pub mod error;
pub mod progress_service;
pub mod registry;
pub mod testing_service;
pub mod video_service;
pub mod video_uploader;

pub use ai_generator::AiGenerator;
pub use api_client::PortalApi;
pub use app_services::AppServices;
pub use error::{ApiError, AppServicesError, GeneratorError, TestingError, UploadError};
pub use portal_core::Clock;
pub use progress_service::{ProgramSummary, ProgressService};
pub use registry::{
    ProtocolQuery, RegistryService, RegistryStats, SortBy, StatusFilter, export_csv,
    export_filename, filter_protocols, registry_stats,
};
pub use testing_service::{Listener, TestingService, next_protocol_number};
pub use video_service::VideoService;
pub use video_uploader::VideoUploader;
