/// Example: print the matrices of the soft-shadow demo scene
///
/// Usage: cargo run --example scene_matrices -- [rotation-degrees]

use shadowmath_core::{Camera, Matrix4, Transform};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    let rotation: f32 = match env::args().nth(1) {
        Some(arg) => arg.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("bad angle {arg:?}: {e}"))
        })?,
        None => 0.0,
    };

    let eye = Camera::soft_shadow_eye();
    let light = Camera::soft_shadow_light();

    // the model sits on the floor: lifted by its lowest y
    let min_y = -1.0;
    let model = Transform::new()
        .with_translation(0.0, -min_y, 0.0)
        .with_rotation(rotation, [0.0, 1.0, 0.0])
        .matrix()
        .map_err(io::Error::other)?;

    let view = eye.view_matrix().map_err(io::Error::other)?;
    let projection = eye.projection_matrix();
    let mvp = Transform::mvp(&model, &view, &projection);
    let light_mvp = light.mvp(&model).map_err(io::Error::other)?;
    let normal = model.normal_matrix().map_err(io::Error::other)?;

    print_matrix("model", &model);
    print_matrix("view", &view);
    print_matrix("projection", &projection);
    print_matrix("mvp", &mvp);
    print_matrix("light mvp", &light_mvp);
    println!("normal matrix:{normal:?}");

    match mvp.inverse() {
        Ok(inverse) => print_matrix("inverse mvp", &inverse),
        Err(e) => println!("inverse mvp: {e}"),
    }

    Ok(())
}

fn print_matrix(name: &str, m: &Matrix4) {
    println!("{name}:{m:?}");
}
