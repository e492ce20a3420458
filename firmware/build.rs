use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=USB_SERIAL_LIB_DIR");

    // Only run for the correct target
    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("avr") {
        println!("cargo:warning=Not targeting avr; skipping usb_serial link.");
        return;
    }

    if env::var_os("CARGO_FEATURE_USB_SERIAL").is_none() {
        return;
    }

    // PJRC usb_serial, prebuilt with avr-gcc for the at90usb1286:
    //   make -C usb_serial MCU=at90usb1286 && avr-ar rcs libusb_serial.a usb_serial.o
    match env::var("USB_SERIAL_LIB_DIR") {
        Ok(dir) => println!("cargo:rustc-link-search=native={dir}"),
        Err(_) => println!("cargo:warning=USB_SERIAL_LIB_DIR not set; expecting libusb_serial.a on the default search path."),
    }
    println!("cargo:rustc-link-lib=static=usb_serial");
}
