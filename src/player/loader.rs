use crate::player::MovementParams;
use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::log::info;
use thiserror::Error;

#[derive(Default)]
pub struct MovementParamsLoader;

#[derive(Debug, Error)]
pub enum MovementParamsLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::de::SpannedError),
}

impl AssetLoader for MovementParamsLoader {
    type Asset = MovementParams;
    type Settings = ();
    type Error = MovementParamsLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let mut params = ron::de::from_bytes::<MovementParams>(&bytes)?;
        // clamp ranges and derive gravity/launch velocity before any
        // controller tick can observe the new values
        params.finalize();
        info!("loaded movement params from {:?}", load_context.path());
        Ok(params)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}
