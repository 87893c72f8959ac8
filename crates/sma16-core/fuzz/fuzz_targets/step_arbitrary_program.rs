#![no_main]

use libfuzzer_sys::fuzz_target;
use sma16_core::{
    decode_image, step_one, CoreConfig, CoreState, MmioBus, MmioError, MmioWriteResult, NoTrace,
    ADDRESS_MASK,
};

#[derive(Default)]
struct NoopMmio;

impl MmioBus for NoopMmio {
    fn write16(&mut self, _addr: u16, _value: u16) -> Result<MmioWriteResult, MmioError> {
        Ok(MmioWriteResult::Applied)
    }

    fn emit_text(&mut self, _text: &str) -> Result<(), MmioError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let image = decode_image(data);
    let mut state = CoreState::with_memory(image.memory);
    let mut mmio = NoopMmio;
    let config = CoreConfig::default();

    for _ in 0..4096 {
        if state.arch.halt() {
            break;
        }
        let _ = step_one(&mut state, &mut mmio, &config, &mut NoTrace);
        assert_eq!(state.arch.pc() & !ADDRESS_MASK, 0);
    }
});
