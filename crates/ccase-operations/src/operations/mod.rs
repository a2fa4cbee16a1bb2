mod classify;
mod rollback;

pub use classify::{Category, ChangeProvider, Classification, OFFLINE_REMINDER};
pub use rollback::{
    BENIGN_UPDATE_PREFIXES, RollbackEnvironment, RollbackSummary, classify_update_output,
};
