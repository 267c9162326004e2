pub mod analytics;
pub mod domain;
pub mod fallback;
pub mod ports;
pub mod reflection;
pub mod repository;
pub mod settings;
pub mod views;

pub use domain::{
    Account, AccountCredentials, ActivityLog, Course, Intervention, Module, Notification,
    Reflection, Role, UserSettings,
};
pub use fallback::{Lookup, Tier, TieredStore};
pub use ports::{Document, DocumentStore, PortError, PortResult, Query, SortOrder};
pub use repository::{Entity, Repositories, Repository};
pub use settings::{SettingsError, SettingsPatch};
