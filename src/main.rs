// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

#![forbid(non_ascii_idents)]
#![deny(unsafe_code)]

use std::path::Path;
use std::time::Duration;

use actix::clock::sleep;
use actix::{Actor, Addr};
use clap::{Arg, Command};
use log::{error, info, warn};

use oversight_intg::configuration::{DEF_CONFIG_FILE, DeviceSettings, get_configuration};
use oversight_intg::errors::ServiceError;
use oversight_intg::{APP_VERSION, Controller, SetupDevice, built_info};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new(built_info::PKG_NAME)
        .author("Unfolded Circle ApS")
        .version(APP_VERSION)
        .about("OverSight Android TV overlay integration")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file"),
        )
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg_file = match args.get_one::<String>("config") {
        None => {
            if Path::new(DEF_CONFIG_FILE).exists() {
                info!("Loading default configuration file: {DEF_CONFIG_FILE}");
                Some(DEF_CONFIG_FILE)
            } else {
                None
            }
        }
        Some(c) => Some(c.as_str()),
    };
    let cfg = get_configuration(cfg_file)?;

    info!("{} {APP_VERSION} starting", built_info::PKG_NAME);
    if cfg.devices.is_empty() {
        warn!("No OverSight devices configured");
    }

    let devices = cfg.devices.clone();
    let retry_interval = cfg.polling.update_interval;
    let controller = Controller::new(cfg).start();

    actix::spawn(async move {
        if let Err(e) = setup_devices(controller, devices, retry_interval).await {
            error!("Device setup aborted: {e}");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}

/// Set up all devices. Devices which can't be set up are retried until they succeed.
async fn setup_devices(
    controller: Addr<Controller>,
    mut pending: Vec<DeviceSettings>,
    retry_interval: Duration,
) -> Result<(), ServiceError> {
    loop {
        let mut failed = Vec::new();
        for device in pending {
            match controller.send(SetupDevice(device.clone())).await? {
                Ok(info) => info!("Device '{}' ready: {}", info.name, info.identifier),
                Err(ServiceError::SetupFailed(e)) => {
                    error!("[{}] Device setup failed: {e}", device.address());
                    failed.push(device);
                }
                Err(e) => error!("[{}] {e}", device.address()),
            }
        }

        if failed.is_empty() {
            return Ok(());
        }
        info!("Retrying setup of {} device(s) in {retry_interval:?}", failed.len());
        sleep(retry_interval).await;
        pending = failed;
    }
}
