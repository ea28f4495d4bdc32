use std::collections::BTreeMap;

use chrono::{NaiveTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{
    AvailabilityError, AvailabilityWindow, CreateAvailabilityRequest, CreateProviderRequest,
    Modality, Provider, ProviderAvailabilityResponse, ProviderId, MAX_CONSULTATION_MINUTES,
};

/// Validates the shape of a window before it can reach the slot generator.
pub fn validate_window(
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
    consultation_minutes: Option<u32>,
) -> Result<u8, AvailabilityError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(AvailabilityError::InvalidDayOfWeek(day_of_week));
    }

    if start_time >= end_time {
        return Err(AvailabilityError::InvalidWindow {
            start: start_time,
            end: end_time,
        });
    }

    if let Some(minutes) = consultation_minutes {
        validate_consultation_minutes(minutes)?;
    }

    Ok(day_of_week as u8)
}

fn validate_consultation_minutes(minutes: u32) -> Result<u32, AvailabilityError> {
    if minutes == 0 || minutes > MAX_CONSULTATION_MINUTES {
        return Err(AvailabilityError::InvalidConsultationLength);
    }
    Ok(minutes)
}

/// In-memory roster of providers and their weekly windows. Pure lookups, no I/O.
///
/// Providers iterate in id order, which is the deterministic tie-break order
/// used by offer sorting and load balancing.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    providers: BTreeMap<ProviderId, Provider>,
    windows: BTreeMap<ProviderId, Vec<AvailabilityWindow>>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_provider(&mut self, provider: Provider) {
        self.windows.entry(provider.id).or_default();
        self.providers.insert(provider.id, provider);
    }

    pub fn provider(&self, provider_id: ProviderId) -> Option<&Provider> {
        self.providers.get(&provider_id)
    }

    pub fn active_providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values().filter(|p| p.active)
    }

    pub fn add_window(&mut self, window: AvailabilityWindow) -> Result<(), AvailabilityError> {
        validate_window(
            window.day_of_week as i32,
            window.start_time,
            window.end_time,
            window.consultation_minutes,
        )?;

        if !self.providers.contains_key(&window.provider_id) {
            return Err(AvailabilityError::ProviderNotFound(window.provider_id));
        }

        self.windows.entry(window.provider_id).or_default().push(window);
        Ok(())
    }

    pub fn set_provider_active(
        &mut self,
        provider_id: ProviderId,
        active: bool,
    ) -> Result<Provider, AvailabilityError> {
        let provider = self
            .providers
            .get_mut(&provider_id)
            .ok_or(AvailabilityError::ProviderNotFound(provider_id))?;

        provider.active = active;
        Ok(provider.clone())
    }

    pub fn set_window_active(
        &mut self,
        provider_id: ProviderId,
        window_id: Uuid,
        active: bool,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        let windows = self
            .windows
            .get_mut(&provider_id)
            .ok_or(AvailabilityError::ProviderNotFound(provider_id))?;

        let window = windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or(AvailabilityError::WindowNotFound(window_id))?;

        window.active = active;
        Ok(window.clone())
    }

    pub fn windows(&self, provider_id: ProviderId) -> &[AvailabilityWindow] {
        self.windows
            .get(&provider_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Active windows of a provider for one weekday and modality. Several
    /// windows may come back for split shifts.
    pub fn active_windows(
        &self,
        provider_id: ProviderId,
        day_of_week: u8,
        modality: Modality,
    ) -> impl Iterator<Item = &AvailabilityWindow> {
        self.windows(provider_id)
            .iter()
            .filter(move |w| w.matches(day_of_week, modality))
    }
}

/// Administrative operations over the shared availability index.
pub struct AvailabilityService {
    index: RwLock<AvailabilityIndex>,
    default_consultation_minutes: u32,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_index(AvailabilityIndex::new(), config.default_consultation_minutes)
    }

    pub fn with_index(index: AvailabilityIndex, default_consultation_minutes: u32) -> Self {
        Self {
            index: RwLock::new(index),
            default_consultation_minutes,
        }
    }

    /// Read access for slot computation. Holders must not await I/O while holding it.
    pub async fn index(&self) -> RwLockReadGuard<'_, AvailabilityIndex> {
        self.index.read().await
    }

    /// Register a provider; consultation length falls back to the clinic default
    pub async fn create_provider(
        &self,
        request: CreateProviderRequest,
    ) -> Result<Provider, AvailabilityError> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(AvailabilityError::MissingDisplayName);
        }

        let consultation_minutes = validate_consultation_minutes(
            request
                .consultation_minutes
                .unwrap_or(self.default_consultation_minutes),
        )?;

        let provider = Provider {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            active: true,
            consultation_minutes,
            created_at: Utc::now(),
        };

        self.index.write().await.upsert_provider(provider.clone());
        info!("Provider registered: {} ({})", provider.display_name, provider.id);

        Ok(provider)
    }

    /// Providers are never deleted, only deactivated.
    pub async fn deactivate_provider(
        &self,
        provider_id: ProviderId,
    ) -> Result<Provider, AvailabilityError> {
        let provider = self.index.write().await.set_provider_active(provider_id, false)?;
        info!("Provider deactivated: {}", provider_id);
        Ok(provider)
    }

    pub async fn create_availability(
        &self,
        provider_id: ProviderId,
        request: CreateAvailabilityRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Creating availability for provider: {}", provider_id);

        let day_of_week = validate_window(
            request.day_of_week,
            request.start_time,
            request.end_time,
            request.consultation_minutes,
        )?;

        let window = AvailabilityWindow {
            id: Uuid::new_v4(),
            provider_id,
            day_of_week,
            modality: request.modality,
            start_time: request.start_time,
            end_time: request.end_time,
            consultation_minutes: request.consultation_minutes,
            active: true,
        };

        self.index.write().await.add_window(window.clone())?;
        debug!("Availability created with ID: {}", window.id);

        Ok(window)
    }

    pub async fn deactivate_availability(
        &self,
        provider_id: ProviderId,
        window_id: Uuid,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        self.index
            .write()
            .await
            .set_window_active(provider_id, window_id, false)
    }

    pub async fn get_provider_availability(
        &self,
        provider_id: ProviderId,
    ) -> Result<ProviderAvailabilityResponse, AvailabilityError> {
        let index = self.index.read().await;
        let provider = index
            .provider(provider_id)
            .ok_or(AvailabilityError::ProviderNotFound(provider_id))?
            .clone();

        let mut windows = index.windows(provider_id).to_vec();
        windows.sort_by_key(|w| (w.day_of_week, w.start_time));

        Ok(ProviderAvailabilityResponse { provider, windows })
    }
}
