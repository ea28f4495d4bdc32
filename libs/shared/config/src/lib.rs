use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use tracing::warn;

pub mod tenant;

pub use tenant::{TenantPolicy, TenantPolicyTable};

pub const DEFAULT_CLINIC_TIMEZONE: Tz = chrono_tz::America::Santiago;
pub const DEFAULT_LEAD_TIME_MINUTES: i64 = 60;
pub const DEFAULT_CONSULTATION_MINUTES: u32 = 10;
pub const DEFAULT_WHATSAPP_API_URL: &str = "https://graph.facebook.com/v19.0";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    pub clinic_timezone: Tz,
    pub lead_time_minutes: i64,
    pub default_consultation_minutes: u32,
    pub tenant_policies: TenantPolicyTable,
    pub whatsapp_api_url: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_api_token: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_service_role_key: String::new(),
            clinic_timezone: DEFAULT_CLINIC_TIMEZONE,
            lead_time_minutes: DEFAULT_LEAD_TIME_MINUTES,
            default_consultation_minutes: DEFAULT_CONSULTATION_MINUTES,
            tenant_policies: TenantPolicyTable::default(),
            whatsapp_api_url: DEFAULT_WHATSAPP_API_URL.to_string(),
            whatsapp_phone_number_id: String::new(),
            whatsapp_api_token: String::new(),
            port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, appointments will be kept in memory");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_ROLE_KEY not set, using empty value");
                    String::new()
                }),
            clinic_timezone: env::var("CLINIC_TIMEZONE")
                .ok()
                .and_then(|name| match name.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(e) => {
                        warn!("CLINIC_TIMEZONE '{}' is not a valid IANA zone: {}", name, e);
                        None
                    }
                })
                .unwrap_or(DEFAULT_CLINIC_TIMEZONE),
            lead_time_minutes: parse_or_default("BOOKING_LEAD_TIME_MINUTES", DEFAULT_LEAD_TIME_MINUTES),
            default_consultation_minutes: parse_or_default(
                "DEFAULT_CONSULTATION_MINUTES",
                DEFAULT_CONSULTATION_MINUTES,
            ),
            tenant_policies: TenantPolicyTable::parse(
                &env::var("TENANT_POLICIES").unwrap_or_default(),
                parse_or_default("DEFAULT_TENANT_POLICY", TenantPolicy::Strict),
            ),
            whatsapp_api_url: env::var("WHATSAPP_API_URL")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_API_URL not set, using default");
                    DEFAULT_WHATSAPP_API_URL.to_string()
                }),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_PHONE_NUMBER_ID not set, using empty value");
                    String::new()
                }),
            whatsapp_api_token: env::var("WHATSAPP_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_API_TOKEN not set, using empty value");
                    String::new()
                }),
            port: parse_or_default("PORT", 3000),
        };

        if !config.is_configured() {
            warn!("Supabase not configured - booking data will not survive a restart");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_service_role_key.is_empty()
    }

    pub fn is_whatsapp_configured(&self) -> bool {
        !self.whatsapp_api_url.is_empty()
            && !self.whatsapp_phone_number_id.is_empty()
            && !self.whatsapp_api_token.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
