use crate::booking::constants::*;
use crate::booking::slots::{SlotCandidate, parse_slot_time};
use crate::config::BotConfig;
use crate::models::credential::Credential;
use crate::models::outcome::Outcome;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use thirtyfour::support::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives one browser session through the booking state machine for a single
/// credential: log in, scan the calendar, confirm a matching slot, otherwise
/// wait and retry. Loops share nothing; each owns its session exclusively.
pub struct SessionDriver {
    credential: Credential,
    config: BotConfig,
}

impl SessionDriver {
    pub fn new(credential: Credential, config: BotConfig) -> Self {
        SessionDriver { credential, config }
    }

    /// Runs until a slot is booked or `shutdown` fires. The WebDriver session
    /// is quit exactly once on every exit path, interrupt included.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let driver = self.build_driver().await?;

        // Everything after session creation runs under the guaranteed-quit
        // scope below, window sizing included.
        let result = tokio::select! {
            _ = shutdown.cancelled() => {
                info!(user = %self.credential.username, "interrupt received, stopping session");
                Ok(())
            }
            res = async {
                driver
                    .set_window_rect(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)
                    .await?;
                self.booking_loop(&driver).await
            } => res,
        };

        info!(user = %self.credential.username, "quitting browser session");
        if let Err(e) = driver.quit().await {
            warn!(user = %self.credential.username, "failed to quit browser session cleanly: {e}");
        }

        result
    }

    async fn build_driver(&self) -> Result<WebDriver> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--no-first-run")?;
        caps.add_arg("--disable-extensions")?;
        caps.add_arg("--disable-notifications")?;
        caps.add_arg("--disable-background-networking")?;
        caps.add_arg("--disable-default-apps")?;
        caps.add_arg("--disable-sync")?;
        caps.add_arg("--mute-audio")?;

        let driver = WebDriver::new(&self.config.webdriver_url, caps)
            .await
            .with_context(|| {
                format!("failed to start browser session at {}", self.config.webdriver_url)
            })?;

        Ok(driver)
    }

    /// Outer loop policy: success is terminal for this credential; login
    /// failure, no-match and confirmation errors all fall back to a fixed
    /// wait, a page refresh and a fresh login.
    async fn booking_loop(&self, driver: &WebDriver) -> Result<()> {
        let user = &self.credential.username;

        loop {
            info!(%user, "starting booking round");

            match self.login(driver).await {
                Ok(()) => {
                    let outcome = self.attempt_booking(driver).await;
                    if let Ok(report) = serde_json::to_string(&outcome) {
                        info!(%user, %report, "booking round finished");
                    }
                    match outcome {
                        Outcome::Success { time } => {
                            info!(%user, %time, "appointment confirmed, stopping checks");
                            return Ok(());
                        }
                        Outcome::NoMatch => info!(%user, "no suitable slot this round"),
                        Outcome::Error { message } => warn!(%user, %message, "booking attempt failed"),
                    }
                }
                Err(e) => warn!(%user, "login failed: {e:#}"),
            }

            info!(%user, "waiting {}s before the next check", RETRY_INTERVAL.as_secs());
            sleep(RETRY_INTERVAL).await;

            if let Err(e) = driver.refresh().await {
                warn!(%user, "page refresh failed: {e}");
            }
        }
    }

    /// Navigates to the portal and submits the login form. The username field
    /// gets a bounded wait; everything after it is expected to be rendered.
    async fn login(&self, driver: &WebDriver) -> Result<()> {
        info!(user = %self.credential.username, url = %self.credential.url, "navigating to portal");
        driver.goto(&self.credential.url).await?;

        let username_input = driver
            .query(By::Id(USERNAME_INPUT_ID))
            .wait(ELEMENT_WAIT, POLL_INTERVAL)
            .first()
            .await
            .context("username field never appeared")?;
        let password_input = driver.find(By::Id(PASSWORD_INPUT_ID)).await?;

        username_input.clear().await?;
        username_input.send_keys(&self.credential.username).await?;
        password_input.clear().await?;
        password_input.send_keys(&self.credential.password).await?;

        driver
            .find(By::Css(LOGIN_SUBMIT_SELECTOR))
            .await?
            .click()
            .await?;

        // Let the post-login page settle.
        sleep(LOGIN_SETTLE).await;
        info!(user = %self.credential.username, "logged in");
        Ok(())
    }

    /// One scan-and-confirm pass, with every failure folded into the outcome
    /// taxonomy so the outer loop can always retry.
    async fn attempt_booking(&self, driver: &WebDriver) -> Outcome {
        match self.scan_and_confirm(driver).await {
            Ok(Some(time)) => Outcome::Success { time },
            Ok(None) => Outcome::NoMatch,
            Err(e) => Outcome::Error {
                message: format!("{e:#}"),
            },
        }
    }

    /// Scans the rendered slot buttons in document order and books the first
    /// one matching the time window and accepted colour. Later candidates are
    /// not inspected once a match is found.
    async fn scan_and_confirm(&self, driver: &WebDriver) -> Result<Option<String>> {
        let user = &self.credential.username;
        let buttons = driver.find_all(By::Css(AVAILABLE_SLOT_SELECTOR)).await?;
        info!(%user, count = buttons.len(), "found available slot button(s)");

        for button in buttons {
            let label = button.text().await?.trim().to_string();
            if parse_slot_time(&label).is_none() {
                debug!(%user, %label, "skipping slot with unexpected time format");
                continue;
            }

            let color = self.computed_background(driver, &button).await?;
            let candidate = SlotCandidate { label, color };
            debug!(%user, label = %candidate.label, color = %candidate.color, "checking slot");

            if candidate.matches(&self.config.accepted_color).is_none() {
                continue;
            }

            info!(%user, time = %candidate.label, "suitable slot found, selecting it");
            button.scroll_into_view().await?;
            sleep(SCROLL_SETTLE).await;
            self.robust_click(driver, &button).await?;

            return self.confirm(driver, candidate.label).await.map(Some);
        }

        Ok(None)
    }

    /// The two-step confirmation flow: confirm dialog, then proceed page.
    async fn confirm(&self, driver: &WebDriver, time: String) -> Result<String> {
        let user = &self.credential.username;

        let confirm_button = self
            .wait_clickable(driver, CONFIRM_BUTTON_SELECTOR)
            .await
            .context("confirmation button never became clickable in time")?;
        confirm_button.scroll_into_view().await?;
        sleep(CLICK_SETTLE).await;
        self.robust_click(driver, &confirm_button).await?;
        info!(%user, %time, "appointment confirmed");

        let proceed_button = self
            .wait_clickable(driver, PROCEED_BUTTON_SELECTOR)
            .await
            .context("proceed button never became clickable in time")?;
        proceed_button.scroll_into_view().await?;
        sleep(CLICK_SETTLE).await;
        proceed_button.click().await?;
        info!(%user, "proceeded to the next step");

        Ok(time)
    }

    /// Waits for a control to be present and clickable under one shared
    /// bound: presence consumes part of the budget, clickability gets the
    /// remainder, so the whole wait never exceeds `ELEMENT_WAIT`.
    async fn wait_clickable(&self, driver: &WebDriver, selector: &'static str) -> Result<WebElement> {
        let started = Instant::now();
        let elem = driver
            .query(By::Css(selector))
            .wait(ELEMENT_WAIT, POLL_INTERVAL)
            .first()
            .await?;
        elem.wait_until()
            .wait(remaining_budget(ELEMENT_WAIT, started.elapsed()), POLL_INTERVAL)
            .clickable()
            .await?;
        Ok(elem)
    }

    /// Reads an element's computed background colour via script.
    async fn computed_background(&self, driver: &WebDriver, elem: &WebElement) -> Result<String> {
        let ret = driver
            .execute(SCRIPT_BACKGROUND_COLOR, Arc::from(vec![elem.to_json()?]))
            .await?;
        Ok(ret.convert::<String>()?)
    }

    /// Direct click first; on any failure, fall back to a script click
    /// against the same element. Propagates only if both fail.
    async fn robust_click(&self, driver: &WebDriver, elem: &WebElement) -> Result<()> {
        if let Err(e) = elem.click().await {
            warn!(
                user = %self.credential.username,
                "direct click failed, trying script click: {e}"
            );
            let args: Vec<Value> = vec![elem.to_json()?];
            driver.execute(SCRIPT_CLICK, Arc::from(args)).await?;
        }
        Ok(())
    }
}

/// What is left of a wait budget after some of it has been spent. Clamps to
/// zero once the budget is exhausted.
fn remaining_budget(total: Duration, elapsed: Duration) -> Duration {
    total.saturating_sub(elapsed)
}
