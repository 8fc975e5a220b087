use trussfos::{force, point, CrossSection, Support, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut truss = Truss::new();
    let left = truss.add_joint(point(0.0, 0.0, 0.0))?;
    let right = truss.add_joint(point(2.0, 0.0, 0.0))?;
    let apex = truss.add_joint(point(1.0, 1.0, 0.0))?;
    truss.set_support(left, Support::pinned())?;
    truss.set_support(right, [false, true, true])?;
    truss.set_support(apex, Support::free().planar())?;
    truss.set_load(apex, force(0.0, -10_000.0, 0.0))?;

    let section = CrossSection::pipe(0.02, 0.002);
    truss.add_member(left, right, "A36", section.clone())?;
    truss.add_member(left, apex, "A36", section.clone())?;
    truss.add_member(right, apex, "A36", section)?;

    truss.evaluate()?;

    if let Some(response) = truss.joint(apex).and_then(|joint| joint.response()) {
        println!("apex uy = {:.3e} m", response.deflection.y);
    }
    for (edge, member) in truss.members() {
        if let Some(response) = member.response() {
            println!(
                "member {}: force = {:+.1} N, fos = {:.2}",
                edge.index(),
                response.axial_force,
                response.fos_limit()
            );
        }
    }

    Ok(())
}
