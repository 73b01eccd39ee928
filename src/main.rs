mod player;
mod util;

use crate::player::*;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy_rapier2d::prelude::*;

/// Collision-group bit shared by every surface the contact sensor should
/// treat as "ground" (must line up with `ground_layer_mask` in player.ron)
const GROUND_GROUP: Group = Group::GROUP_1;
const PLAYER_GROUP: Group = Group::GROUP_2;

fn main() {
	App::new()
		// baseline bevy stuff
		.add_plugins(DefaultPlugins)
		.insert_resource(Time::<Fixed>::from_hz(60.))
		//
		// movement params as a hot-reloadable asset; editing player.ron
		// re-runs the loader, which re-derives gravity and launch velocity
		.init_asset::<MovementParams>()
		.init_asset_loader::<MovementParamsLoader>()
		//
		// controller: variable-rate tick in Update, fixed-rate tick in FixedUpdate
		.init_resource::<PlayerInput>()
		.add_systems(Startup, setup_camera)
		.add_systems(Startup, setup_player)
		.add_systems(Startup, setup_platforms)
		.add_systems(Update, (sample_input, player_jump_input_system).chain())
		.add_systems(Update, update_status_text)
		.add_systems(FixedUpdate, player_fixed_system)
		//
		// rapier physics; the controller drives the body's velocity directly,
		// so rapier's own gravity is disabled on the player
		.insert_resource(TimestepMode::Fixed {
			dt: 1. / 60.,
			substeps: 1,
		})
		.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(10.0).in_fixed_schedule())
		.add_plugins(RapierDebugRenderPlugin::default())
		.run();
}

fn setup_camera(mut commands: Commands) {
	commands.spawn((
		Camera2d,
		Transform::from_xyz(50.0, 50.0, 1.0),
		OrthographicProjection {
			scaling_mode: ScalingMode::AutoMin {
				min_width: 100.,
				min_height: 100.,
			},
			..OrthographicProjection::default_2d()
		},
	));
}

struct WallArgs {
	color: Color,
	pos: Vec2,
	size: Vec2,
}
impl WallArgs {
	fn spawn(self, commands: &mut Commands) {
		let WallArgs { color, pos, size } = self;
		commands.spawn((
			RigidBody::Fixed,
			Sprite::from_color(color, size),
			Collider::cuboid(size.x * 0.5, size.y * 0.5),
			CollisionGroups::new(GROUND_GROUP, Group::ALL),
			Transform::from_xyz(pos.x, pos.y, 0.0),
		));
	}
}

fn setup_platforms(mut commands: Commands) {
	// background
	commands.spawn((
		Sprite::from_color(Color::srgba(0., 0.5, 0.75, 0.2), Vec2::new(100., 100.)),
		Transform::from_xyz(50., 50., 0.),
	));

	// floor
	WallArgs {
		color: Color::srgb(0.15, 0.8, 0.25),
		pos: Vec2::new(50., 3.),
		size: Vec2::new(98.0, 4.0),
	}
	.spawn(&mut commands);

	// platform 1
	WallArgs {
		color: Color::srgb(0.15, 0.8, 0.25),
		pos: Vec2::new(75.0, 18.0),
		size: Vec2::new(20.0, 4.0),
	}
	.spawn(&mut commands);

	// platform 2
	WallArgs {
		color: Color::srgb(0.15, 0.8, 0.25),
		pos: Vec2::new(50.0, 35.0),
		size: Vec2::new(20.0, 2.0),
	}
	.spawn(&mut commands);

	// west wall
	WallArgs {
		color: Color::srgb(0.15, 0.5, 0.15),
		pos: Vec2::new(3., 50.),
		size: Vec2::new(4.0, 98.0),
	}
	.spawn(&mut commands);

	// east wall
	WallArgs {
		color: Color::srgb(0.45, 0.5, 0.15),
		pos: Vec2::new(97., 50.),
		size: Vec2::new(4.0, 98.0),
	}
	.spawn(&mut commands);

	// ceiling, low enough to head-bump from the top platform
	WallArgs {
		color: Color::srgb(0.45, 0.8, 0.25),
		pos: Vec2::new(50., 97.),
		size: Vec2::new(98.0, 4.0),
	}
	.spawn(&mut commands);
}

#[derive(Component)]
struct PlayerStatusText;

fn setup_player(mut commands: Commands, asset_server: Res<AssetServer>) {
	commands.spawn((
		Player(asset_server.load("player.ron")),
		Sprite::from_color(Color::srgb(1., 0.5, 0.), Vec2::new(3.0, 5.0)),
		Transform::from_xyz(25., 25., 0.),
		RigidBody::Dynamic,
		Collider::cuboid(1.5, 2.5),
		Velocity::zero(),
		GravityScale(0.0),
		LockedAxes::ROTATION_LOCKED,
		Friction {
			coefficient: 0.0,
			combine_rule: CoefficientCombineRule::Multiply,
		},
		CollisionGroups::new(PLAYER_GROUP, Group::ALL),
		Ccd::enabled(),
	));

	// Debug text for player state
	commands.spawn((
		PlayerStatusText,
		Text::new("hello world"),
		TextLayout::new_with_justify(JustifyText::Right),
		Node {
			position_type: PositionType::Absolute,
			top: Val::Px(10.0),
			right: Val::Px(10.0),
			..default()
		},
	));
}

fn update_status_text(
	player_query: Query<(&PlayerMovementState, &Velocity)>,
	mut status_text_query: Query<&mut Text, With<PlayerStatusText>>,
) {
	let Ok((state, velocity)) = player_query.get_single() else {
		return;
	};
	let Ok(mut status_text) = status_text_query.get_single_mut() else {
		return;
	};
	status_text.0 = format!(
		"vx: {}\nvy: {}\ngrounded: {}\njumping: {}\nfalling: {}\njumps used: {}",
		velocity.linvel.x,
		velocity.linvel.y,
		state.contacts.is_grounded,
		state.is_jumping,
		state.is_falling,
		state.jumps_used,
	);
}
