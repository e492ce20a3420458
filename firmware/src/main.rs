#![no_std]
#![no_main]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch, abi_avr_interrupt))]

#[cfg(all(feature = "usb-serial", feature = "uart"))]
compile_error!("select exactly one host link: `usb-serial` or `uart`");

#[cfg(not(any(feature = "usb-serial", feature = "uart")))]
compile_error!("select a host link: `usb-serial` or `uart`");

mod boot;
#[cfg(feature = "usb-serial")]
mod usb;

use model100::{
    avr::{
        self,
        timer::{Bias, Tick},
        Ports,
    },
    board::LED,
    Config, Console, HostLink, PinBank,
};

const BANNER: &[u8] = b"lcd model100\r\n";

#[cfg(feature = "usb-serial")]
type Host = usb::UsbSerial;

#[cfg(feature = "uart")]
type Host = avr::uart::Usart1;

#[cfg(feature = "usb-serial")]
unsafe fn open_host(_config: &Config) -> Host {
    unsafe { usb::UsbSerial::init() }
}

#[cfg(feature = "uart")]
unsafe fn open_host(config: &Config) -> Host {
    match unsafe { avr::uart::Usart1::new(config) } {
        Ok(usart) => {
            unsafe { boot::enable_interrupts() };
            usart
        }
        Err(err) => boot::halt(err),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn main() -> ! {
    let config = Config::MODEL100;

    unsafe { avr::init_cpu() };
    let mut host = unsafe { open_host(&config) };
    let _bias = unsafe { Bias::start(&config) };

    // LED stays lit until the host shows up
    let mut ports = unsafe { Ports::new(&config) };
    ports.direction(LED, true);
    ports.out(LED, true);

    let mut console = Console::init(ports);
    let mut tick = unsafe { Tick::start(&config) };

    #[cfg(feature = "usb-serial")]
    host.wait_for_host(console.bus.bank_mut(), config.host_settle_ms);
    console.bus.bank_mut().out(LED, false);

    host.write(BANNER);
    console.test_pattern();

    loop {
        console.step(&mut host, &mut tick);
    }
}
