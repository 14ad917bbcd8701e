// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! OverSight device command line tool.
//!
//! Sends a single request to an OverSight device and prints the result.

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};
use const_format::formatcp;
use log::debug;
use std::str::FromStr;

use oversight_intg::APP_VERSION;
use oversight_intg::client::{
    DeviceClient, DeviceState, FixedNotification, FixedNotificationBuilder, NotificationBuilder,
};
use oversight_intg::configuration::{ClientSettings, DEF_DEVICE_PORT, DeviceSettings};
use oversight_intg::entity::{EntityAction, Platform, command, platform_of};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new("oversight-cmd")
        .author("Unfolded Circle ApS")
        .version(APP_VERSION)
        .about("OverSight Android TV device tool")
        .arg(
            Arg::new("host")
                .long("host")
                .required(true)
                .help("Device hostname or IP address"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_parser(value_parser!(u16).range(1..))
                .default_value(formatcp!("{}", DEF_DEVICE_PORT))
                .help("Device API port"),
        )
        .subcommand_required(true)
        .subcommand(Command::new("info").about("Show device information and state"))
        .subcommand(
            Command::new("notify")
                .about("Send a popup notification")
                .arg(Arg::new("message").required(true))
                .arg(Arg::new("title").long("title")),
        )
        .subcommand(
            Command::new("fixed")
                .about("Create or update a fixed notification")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("text").long("text"))
                .arg(Arg::new("icon").long("icon")),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a fixed notification")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("fixed-list").about("List active fixed notifications"))
        .subcommand(Command::new("screen-on").about("Wake the device screen"))
        .subcommand(Command::new("restart").about("Restart the overlay service"))
        .subcommand(
            Command::new("set")
                .about("Change a device setting, e.g. `set pixel_shift on`")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true)),
        )
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let device = DeviceSettings::new(
        args.get_one::<String>("host")
            .map(|h| h.trim().to_string())
            .unwrap_or_default(),
        args.get_one::<u16>("port").copied().unwrap_or(DEF_DEVICE_PORT),
    );
    let client = DeviceClient::new(&device, &ClientSettings::default())?;
    debug!("Using device API at {}", client.base_url());

    let result = match args.subcommand() {
        Some(("info", _)) => {
            let info = client.get_info().await?;
            let state = DeviceState::from_info(&info)?;
            serde_json::to_value(state)?
        }
        Some(("notify", sub)) => {
            let mut notification = NotificationBuilder::default();
            notification.message(required(sub, "message")?);
            if let Some(title) = sub.get_one::<String>("title") {
                notification.title(title);
            }
            client.send_notification(&notification.build()?).await?
        }
        Some(("fixed", sub)) => {
            let mut notification = FixedNotificationBuilder::default();
            notification.id(required(sub, "id")?);
            if let Some(text) = sub.get_one::<String>("text") {
                notification.text(text);
            }
            if let Some(icon) = sub.get_one::<String>("icon") {
                notification.icon(icon);
            }
            client
                .send_fixed_notification(&notification.build()?)
                .await?
        }
        Some(("remove", sub)) => {
            let notification = FixedNotification::remove(required(sub, "id")?);
            client.send_fixed_notification(&notification).await?
        }
        Some(("fixed-list", _)) => client.get_fixed_notifications().await?,
        Some(("screen-on", _)) => client.screen_on().await?,
        Some(("restart", _)) => client.restart_service().await?,
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let action = setting_action(key, required(sub, "value")?)?;
            command(key, action)?.send(&client).await?
        }
        _ => return Err(anyhow!("Unknown command")),
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(|v| v.as_str())
        .ok_or_else(|| anyhow!("Missing argument: {name}"))
}

/// Parse the setting value for the entity platform of the key.
fn setting_action(key: &str, value: &str) -> anyhow::Result<EntityAction> {
    match platform_of(key) {
        Some(Platform::Number) => Ok(EntityAction::SetValue {
            value: f64::from_str(value).map_err(|e| anyhow!("Invalid number '{value}': {e}"))?,
        }),
        Some(Platform::Select) => Ok(EntityAction::SelectOption {
            option: value.to_string(),
        }),
        Some(Platform::Switch) => match value.to_lowercase().as_str() {
            "on" | "true" | "1" => Ok(EntityAction::TurnOn),
            "off" | "false" | "0" => Ok(EntityAction::TurnOff),
            _ => Err(anyhow!("Invalid switch value '{value}', use on or off")),
        },
        _ => Err(anyhow!("'{key}' is not a device setting")),
    }
}
