//! `plaud devices` command implementation

use crate::actions::{execute_batch, Action, InputItem};
use crate::api::ApiClient;
use crate::commands::print_items;
use crate::config::Config;
use crate::error::Result;

/// List devices linked to the account
pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    let items = execute_batch(&client, &Action::ListDevices, &[InputItem::default()], false).await?;

    print_items(&items)
}
