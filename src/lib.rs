pub mod app;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod platform;
pub mod router;
pub mod scanner;
pub mod utils;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod desktop;

pub use app::{AppServices, QrApp};
pub use config::{AppConfig, ConfigStore};

#[cfg(feature = "desktop")]
pub(crate) struct AppState {
    pub(crate) app: QrApp,
    pub(crate) camera: std::sync::Arc<scanner::HostCamera>,
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tauri::Manager;

    use desktop::{ArboardClipboard, TauriNotifier, WebviewSelectionCopy};
    use history::Clipboard;
    use platform::OutsideHostSdk;
    use scanner::{FrameSlot, HostCamera, RqrrDecoder};

    // Reads RUST_LOG
    utils::logging::init();

    log::info!("qrledger starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let config_dir = app
                    .path()
                    .app_config_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                let config = ConfigStore::load(&config_dir.join("qrledger.json"))?;

                let camera = Arc::new(HostCamera::new(Arc::new(FrameSlot::new())));
                let notifier = Arc::new(TauriNotifier::new(
                    app.handle().clone(),
                    config.feedback_ms,
                ));
                let clipboard = Clipboard::new(
                    Some(Arc::new(ArboardClipboard)),
                    Arc::new(WebviewSelectionCopy::new(app.handle().clone())),
                );

                let qr_app = QrApp::new(
                    config,
                    AppServices {
                        camera: camera.clone(),
                        decoder: Arc::new(RqrrDecoder),
                        sdk: Arc::new(OutsideHostSdk),
                        clipboard,
                        notifier,
                    },
                );

                app.manage(AppState {
                    app: qr_app,
                    camera,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            commands::navigate,
            commands::toggle_camera,
            commands::reset_camera_history,
            commands::get_history,
            commands::remove_history_entry,
            commands::copy_history_entry,
            commands::platform_scan,
            commands::report_camera_status,
            commands::push_camera_frame,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
