mod contacts;
mod controller;
mod input;
mod loader;
mod params;
mod state;

use bevy::asset::Handle;
use bevy::prelude::Component;
pub use contacts::*;
pub use controller::*;
pub use input::*;
pub use loader::*;
pub use params::*;
pub use state::*;

#[derive(Component, Debug)]
#[require(PlayerMovementState)]
pub struct Player(pub Handle<MovementParams>);
