use thermohygro::{ThermoHygro, available_endpoints};

fn main() {
    // List the serial endpoints reachable on this system.
    for endpoint in available_endpoints().expect("Failed to enumerate serial ports") {
        println!("{}: {}", endpoint.name, endpoint.description);
    }

    let port = "/dev/ttyUSB0";

    // Open the session; the driver applies the fixed 9600 baud 8N1 framing.
    let mut inst = ThermoHygro::new();
    println!("{}", inst.connect(port).expect("Failed to open serial port"));

    // Read the full channel bundle.
    let mea = inst.read_all();
    println!("Probe 1 temperature: {:?} degC", mea.temperature1);
    println!("Relative humidity: {:?} %RH", mea.humidity);
    println!("Probe 2 temperature: {:?} degC", mea.temperature2);
    println!("Dew point: {:?} degC", mea.dewpoint);

    // Read a single probe as a typed temperature.
    println!("Probe 1: {:?}", inst.temperature1());

    println!("{}", inst.disconnect().unwrap());
}
