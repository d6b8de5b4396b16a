mod add;
mod delete;
mod list;
mod search;
pub mod server;

pub use add::*;
pub use delete::*;
pub use list::*;
pub use search::*;
pub use server::*;

use crate::config::Opts;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}
