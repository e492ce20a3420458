#[cfg(target_arch = "avr")]
use core::panic::PanicInfo;

#[cfg(feature = "uart")]
use model100::Error;

#[cfg(target_arch = "avr")]
#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {}
}

/// Stop here for good. Only reachable through a bad build-time `Config`.
#[cfg(feature = "uart")]
pub fn halt(err: Error) -> ! {
    log::error!("halted: {}", err);
    loop {}
}

#[cfg(feature = "uart")]
#[inline(always)]
pub unsafe fn enable_interrupts() {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::arch::asm!("sei")
    };
}

// USART1_RX
#[cfg(all(target_arch = "avr", feature = "uart"))]
#[unsafe(no_mangle)]
pub unsafe extern "avr-interrupt" fn __vector_25() {
    unsafe { model100::avr::uart::on_receive() };
}
