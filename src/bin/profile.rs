use maze_carver::app::profile;

fn main() {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let size = u8::MAX as u16;
    let report = profile(size, size, num_iters, seed);
    println!(
        "{} generation(s) of a {}x{} maze in {:?}: {} steps total, {}..={} per generation",
        report.generations,
        size,
        size,
        report.elapsed,
        report.total_steps,
        report.min_steps,
        report.max_steps
    );
}
