//! Draws soft bodies as textured meshes rebuilt from their fan every frame

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::render::view::NoFrustumCulling;
use squish_core::soft_body::fan_to_triangle_list;
use squish_core::{Drawable, MeshVertex};
use tracing::warn;

use crate::scene::{SimWorld, SoftBody};
use crate::AppConfig;

/// Fallback texture for soft bodies without one
#[derive(Resource)]
struct CheckerTexture(Handle<Image>);

pub struct SoftBodyRenderPlugin;

impl Plugin for SoftBodyRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_arena_visuals))
            .add_systems(Update, (attach_visuals, sync_meshes).chain());
    }
}

fn setup_camera(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    commands.spawn(Camera2d);
    commands.insert_resource(CheckerTexture(images.add(checker_image(256, 8))));
}

fn spawn_arena_visuals(mut commands: Commands, app_config: Res<AppConfig>) {
    let config = &app_config.config;
    let Some(arena) = &config.world.arena else {
        return;
    };
    let ppm = config.viewer.pixels_per_meter;
    let half_w = arena.width * 0.5 * ppm;
    let half_h = arena.height * 0.5 * ppm;
    let t = arena.wall_thickness * ppm;
    let color = Color::srgb(0.25, 0.27, 0.32);

    let walls = [
        (Vec2::new(0.0, -half_h - t * 0.5), Vec2::new(2.0 * (half_w + t), t)),
        (Vec2::new(0.0, half_h + t * 0.5), Vec2::new(2.0 * (half_w + t), t)),
        (Vec2::new(-half_w - t * 0.5, 0.0), Vec2::new(t, 2.0 * half_h)),
        (Vec2::new(half_w + t * 0.5, 0.0), Vec2::new(t, 2.0 * half_h)),
    ];
    for (center, size) in walls {
        commands.spawn((
            Sprite::from_color(color, size),
            Transform::from_translation(center.extend(-1.0)),
        ));
    }
}

fn attach_visuals(
    mut commands: Commands,
    app_config: Res<AppConfig>,
    world: Res<SimWorld>,
    asset_server: Res<AssetServer>,
    checker: Res<CheckerTexture>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    new_bodies: Query<(Entity, &SoftBody), Without<Mesh2d>>,
) {
    let ppm = app_config.config.viewer.pixels_per_meter;
    for (entity, body) in new_bodies.iter() {
        let fan = match body.node.triangle_fan(&world) {
            Ok(fan) => fan,
            Err(e) => {
                warn!("Skipping visuals: {}", e);
                continue;
            }
        };
        let texture = match body.node.texture_path() {
            Some(path) => asset_server.load(path.to_string()),
            None => checker.0.clone(),
        };

        commands.entity(entity).insert((
            Mesh2d(meshes.add(fan_mesh(&fan))),
            MeshMaterial2d(materials.add(ColorMaterial::from(texture))),
            Transform::from_scale(Vec3::splat(ppm)),
            NoFrustumCulling,
        ));
    }
}

fn sync_meshes(
    world: Res<SimWorld>,
    mut meshes: ResMut<Assets<Mesh>>,
    bodies: Query<(&SoftBody, &Mesh2d)>,
) {
    for (body, mesh2d) in bodies.iter() {
        let Some(mesh) = meshes.get_mut(&mesh2d.0) else {
            continue;
        };
        match body.node.triangle_fan(&world) {
            Ok(fan) => write_fan(mesh, &fan),
            Err(e) => warn!("Mesh not updated: {}", e),
        }
    }
}

/// Triangle-list mesh for a fan
pub fn fan_mesh(fan: &[MeshVertex]) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    write_fan(&mut mesh, fan);
    mesh
}

/// Replace positions, UVs and indices with the current fan
pub fn write_fan(mesh: &mut Mesh, fan: &[MeshVertex]) {
    let positions: Vec<[f32; 3]> = fan
        .iter()
        .map(|v| [v.position[0], v.position[1], 0.0])
        .collect();
    let uvs: Vec<[f32; 2]> = fan.iter().map(|v| v.tex_coord).collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(fan_to_triangle_list(fan.len())));
}

/// Two-tone checkerboard, `cells` squares per side
pub fn checker_image(size: u32, cells: u32) -> Image {
    let cell = (size / cells.max(1)).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let rgba = if (x / cell + y / cell) % 2 == 0 {
                [255, 196, 64, 255]
            } else {
                [230, 90, 120, 255]
            };
            data.extend_from_slice(&rgba);
        }
    }
    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}
