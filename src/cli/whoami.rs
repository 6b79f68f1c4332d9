use clap::Args;

use crate::cli::root::print_json;
use crate::common::StocklyError;
use crate::config::Context;
use crate::Result;

#[derive(Args, Debug)]
pub struct WhoamiCommand {
    /// Print the user as json
    #[arg(long)]
    json: bool,
}

impl WhoamiCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let user = context
            .session
            .snapshot()
            .user
            .ok_or(StocklyError::Unauthenticated)?;

        if self.json {
            return print_json(&user);
        }

        println!("{} <{}> id={} role={}", user.username, user.email, user.id, user.role);
        match user.role.sections() {
            None => println!("sections: *"),
            Some(sections) => {
                let sections: Vec<String> = sections.iter().map(|s| format!("{:?}", s)).collect();
                println!("sections: {}", sections.join(", "));
            }
        }
        Ok(())
    }
}
