use clap::Args;

use crate::config::Context;
use crate::core::{Decision, Role, RouteGuard};
use crate::Result;

#[derive(Args, Debug)]
pub struct GuardCommand {
    /// Roles allowed on the route, e.g. BUYER
    #[arg(long = "allow", required = true)]
    allowed: Vec<Role>,
}

impl GuardCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let guard = RouteGuard::with_config(self.allowed, &context.routes);
        let mut changes = context.session.subscribe();

        match guard.settled(&mut changes).await {
            Decision::Render => println!("render"),
            Decision::RedirectToLogin(path) | Decision::RedirectToUnauthorized(path) => {
                println!("redirect {}", path)
            }
            Decision::Loading => println!("loading"),
        }
        Ok(())
    }
}
