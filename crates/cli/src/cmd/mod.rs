mod bundle;
mod discover;
mod init;
mod plan;
mod routes;

pub use bundle::cmd_bundle;
pub use discover::cmd_discover;
pub use init::cmd_init;
pub use plan::{PlanArgs, cmd_plan};
pub use routes::cmd_routes;
