use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use super::{
    auth::{OpenAccess, TokenVerifier},
    config::Config,
    database::{ProfileStore, StaticProfiles},
    spotify::SpotifyClient,
    supabase::SupabaseClient,
};

pub struct State {
    pub config: Config,
    pub profiles: Arc<dyn ProfileStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub spotify: Option<SpotifyClient>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let http = Client::new();

        let (profiles, verifier): (Arc<dyn ProfileStore>, Arc<dyn TokenVerifier>) =
            match &config.supabase {
                Some(supabase_config) => {
                    info!("Using Supabase at {}", supabase_config.url);
                    let supabase = Arc::new(SupabaseClient::new(http.clone(), supabase_config));
                    let profiles: Arc<dyn ProfileStore> = supabase.clone();

                    (profiles, supabase as Arc<dyn TokenVerifier>)
                }
                None => {
                    info!("Using static profiles, protected data is open");
                    (
                        Arc::new(StaticProfiles::new()) as Arc<dyn ProfileStore>,
                        Arc::new(OpenAccess) as Arc<dyn TokenVerifier>,
                    )
                }
            };

        let spotify = config
            .spotify
            .clone()
            .map(|spotify_config| SpotifyClient::new(http, spotify_config));

        Arc::new(Self {
            config,
            profiles,
            verifier,
            spotify,
        })
    }
}
