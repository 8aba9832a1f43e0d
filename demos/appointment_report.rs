use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    appointments::example_apps::run_appointment_report(std::env::args().skip(1))
}
