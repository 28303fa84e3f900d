use crate::api::{Connector, ShortcutApi};
use crate::error::{Result, ShortcutError};
use crate::settings::{SettingKey, Settings};
use crate::shell::Shell;
use crate::ui::Ui;
use std::rc::Rc;

/// Everything a command workflow touches, passed in explicitly.
///
/// The API handle is connected on first use with the stored token and reused
/// until the token changes.
pub struct Session<'a> {
    pub settings: Settings,
    pub ui: &'a mut dyn Ui,
    pub shell: &'a dyn Shell,
    connector: &'a dyn Connector,
    api: Option<(String, Rc<dyn ShortcutApi>)>,
}

impl<'a> Session<'a> {
    pub fn new(
        settings: Settings,
        ui: &'a mut dyn Ui,
        shell: &'a dyn Shell,
        connector: &'a dyn Connector,
    ) -> Self {
        Self {
            settings,
            ui,
            shell,
            connector,
            api: None,
        }
    }

    pub fn api(&mut self) -> Result<Rc<dyn ShortcutApi>> {
        let token = self
            .settings
            .get(SettingKey::Token)
            .ok_or(ShortcutError::NoToken)?
            .to_string();

        if let Some((cached, api)) = &self.api {
            if *cached == token {
                return Ok(Rc::clone(api));
            }
        }

        tracing::debug!("connecting API client");
        let api: Rc<dyn ShortcutApi> = Rc::from(self.connector.connect(&token)?);
        self.api = Some((token, Rc::clone(&api)));
        Ok(api)
    }
}
