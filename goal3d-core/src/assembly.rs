//! Soccer goal assembly
//!
//! Builds the description of the whole scene: goal frame, nets, ball and
//! corner flags. Each placement is written as a [`Transform::sequence`] so the
//! rotate-then-translate order of the slanted parts stays explicit.

use nalgebra::Matrix4;
use tracing::debug;

use crate::config::GoalConfig;
use crate::error::Result;
use crate::material::{Material, MaterialId, Rgb};
use crate::primitives::Primitive;
use crate::scene::{NodeId, SceneBuilder, SceneDescription, SceneGraph};
use crate::transform::{Axis, Transform};

/// Node names produced by [`goal_description`]
pub mod names {
    pub const ROOT: &str = "scene";
    pub const GOAL: &str = "goal";
    pub const SKELETON: &str = "skeleton";
    pub const NETS: &str = "nets";
    pub const CROSSBAR: &str = "crossbar";
    pub const LEFT_JOINT: &str = "left_joint";
    pub const RIGHT_JOINT: &str = "right_joint";
    pub const LEFT_POST: &str = "left_post";
    pub const RIGHT_POST: &str = "right_post";
    pub const LEFT_SUPPORT: &str = "left_support";
    pub const RIGHT_SUPPORT: &str = "right_support";
    pub const BACK_NET: &str = "back_net";
    pub const LEFT_NET: &str = "left_net";
    pub const RIGHT_NET: &str = "right_net";
    pub const LEFT_FRONT_TORUS: &str = "left_front_torus";
    pub const LEFT_BACK_TORUS: &str = "left_back_torus";
    pub const RIGHT_FRONT_TORUS: &str = "right_front_torus";
    pub const RIGHT_BACK_TORUS: &str = "right_back_torus";
    pub const BALL: &str = "ball";
    pub const LEFT_FLAG: &str = "left_flag";
    pub const RIGHT_FLAG: &str = "right_flag";
    pub const LEFT_FLAG_POST: &str = "left_flag_post";
    pub const RIGHT_FLAG_POST: &str = "right_flag_post";
    pub const LEFT_PENNANT: &str = "left_pennant";
    pub const RIGHT_PENNANT: &str = "right_pennant";
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    const BOTH: [Side; 2] = [Side::Left, Side::Right];

    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    fn pick(self, left: &'static str, right: &'static str) -> &'static str {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }
}

/// Describe the full scene for `config`
pub fn goal_description(config: &GoalConfig) -> Result<SceneDescription> {
    config.validate()?;
    let d = &config.dimensions;

    let r = d.skeleton_radius;
    let l = d.crossbar_length;
    let p = d.post_length();
    let angle = d.support_angle_degrees;
    let z_support = d.support_z_offset();
    let z_ground = d.support_ground_z();

    let mut scene = SceneBuilder::new(names::ROOT);
    let goal_material = scene.material(Material::new("goal", Rgb::WHITE));
    let net_material = scene.material(Material::new("net", Rgb::NET_GREY).double_sided());
    let ball_material = scene.material(Material::new("ball", Rgb::BLACK));

    let goal = scene.group(names::GOAL, scene.root(), Matrix4::identity());
    let skeleton = scene.group(names::SKELETON, goal, Matrix4::identity());
    let nets = scene.group(names::NETS, goal, Matrix4::identity());

    // crossbar lies along X
    let crossbar = scene.mesh(
        names::CROSSBAR,
        skeleton,
        Primitive::cylinder(r, l),
        goal_material,
        Transform::rotation(90.0, Axis::Z),
    );

    for side in Side::BOTH {
        let x = side.sign() * l / 2.0;

        let post = scene.mesh(
            side.pick(names::LEFT_POST, names::RIGHT_POST),
            skeleton,
            Primitive::cylinder(r, p),
            goal_material,
            Transform::translation(x, -p / 2.0, 0.0),
        );

        scene.mesh(
            side.pick(names::LEFT_SUPPORT, names::RIGHT_SUPPORT),
            skeleton,
            Primitive::cylinder(r, d.support_length()),
            goal_material,
            Transform::sequence(&[
                Transform::rotation(angle, Axis::X),
                Transform::translation(x, -p / 2.0, z_support),
            ]),
        );

        // crossbar-local Y runs along world -X
        scene.mesh(
            side.pick(names::LEFT_JOINT, names::RIGHT_JOINT),
            crossbar,
            Primitive::sphere(r),
            goal_material,
            Transform::translation(0.0, -side.sign() * l / 2.0, 0.0),
        );

        add_toruses(&mut scene, side, post, config, goal_material);
    }

    scene.mesh(
        names::BACK_NET,
        nets,
        Primitive::plane(l, d.support_length()),
        net_material,
        Transform::sequence(&[
            Transform::rotation(angle, Axis::X),
            Transform::translation(0.0, -p / 2.0, z_support),
        ]),
    );

    // shape X becomes world Z after the quarter turn about Y
    let side_net = Primitive::shape([(0.0, 0.0), (0.0, -p), (z_ground, -p)]);
    for side in Side::BOTH {
        scene.mesh(
            side.pick(names::LEFT_NET, names::RIGHT_NET),
            nets,
            side_net.clone(),
            net_material,
            Transform::sequence(&[
                Transform::rotation(-90.0, Axis::Y),
                Transform::translation(side.sign() * l / 2.0, 0.0, 0.0),
            ]),
        );
    }

    let (bx, by, bz) = config.ball_position();
    scene.mesh(
        names::BALL,
        scene.root(),
        Primitive::sphere(d.ball_radius()),
        ball_material,
        Transform::translation(bx, by, bz),
    );

    if config.flags {
        add_flags(&mut scene, config);
    }

    let description = scene.build();
    debug!(records = description.records.len(), flags = config.flags, "described goal scene");
    Ok(description)
}

/// Front torus at the post base, back torus where the support meets the ground
fn add_toruses(
    scene: &mut SceneBuilder,
    side: Side,
    post: NodeId,
    config: &GoalConfig,
    material: MaterialId,
) {
    let d = &config.dimensions;
    let p = d.post_length();
    let torus = Primitive::torus(d.torus_radius(), d.torus_tube());

    let placements = [
        (side.pick(names::LEFT_FRONT_TORUS, names::RIGHT_FRONT_TORUS), 0.0),
        (side.pick(names::LEFT_BACK_TORUS, names::RIGHT_BACK_TORUS), d.support_ground_z()),
    ];
    for (name, z) in placements {
        scene.mesh(
            name,
            post,
            torus.clone(),
            material,
            Transform::sequence(&[
                Transform::rotation(90.0, Axis::X),
                Transform::translation(0.0, -p / 2.0, z),
            ]),
        );
    }
}

/// Corner flags standing on the ground outside each crossbar end
fn add_flags(scene: &mut SceneBuilder, config: &GoalConfig) {
    let d = &config.dimensions;
    let p = d.post_length();
    let post_length = d.flag_post_length();
    let post_radius = d.flag_post_radius();
    let width = d.flag_width();
    let height = d.flag_height();

    let post_material = scene.material(Material::new("flag_post", Rgb::WHITE));
    let pennant_material = scene.material(Material::new("pennant", Rgb::FLAG_RED).double_sided());

    // tip points along +X
    let pennant = Primitive::shape([(0.0, 0.0), (width, -height / 2.0), (0.0, -height)]);

    for side in Side::BOTH {
        let x = side.sign() * (d.crossbar_length / 2.0 + d.flag_offset());
        let flag = scene.group(
            side.pick(names::LEFT_FLAG, names::RIGHT_FLAG),
            scene.root(),
            Transform::translation(x, -p, 0.0),
        );

        scene.mesh(
            side.pick(names::LEFT_FLAG_POST, names::RIGHT_FLAG_POST),
            flag,
            Primitive::cylinder(post_radius, post_length),
            post_material,
            Transform::translation(0.0, post_length / 2.0, 0.0),
        );

        // mirror the left pennant so both point away from the goal
        let facing = match side {
            Side::Left => 180.0,
            Side::Right => 0.0,
        };
        scene.mesh(
            side.pick(names::LEFT_PENNANT, names::RIGHT_PENNANT),
            flag,
            pennant.clone(),
            pennant_material,
            Transform::sequence(&[
                Transform::rotation(facing, Axis::Y),
                Transform::translation(side.sign() * post_radius, post_length, 0.0),
            ]),
        );
    }
}

/// Realized goal scene plus the nodes the animation loop drives
#[derive(Debug, Clone)]
pub struct GoalScene {
    pub graph: SceneGraph,
    pub goal: NodeId,
    pub ball: NodeId,
    pub config: GoalConfig,
}

impl GoalScene {
    /// Describe, validate and realize the scene in one step
    pub fn build(config: GoalConfig) -> Result<Self> {
        let description = goal_description(&config)?;
        let graph = SceneGraph::realize(&description)?;
        let goal = graph.require(names::GOAL)?;
        let ball = graph.require(names::BALL)?;
        Ok(Self {
            graph,
            goal,
            ball,
            config,
        })
    }
}
