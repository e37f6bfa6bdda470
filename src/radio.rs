//! SoftDevice S140 implementation of the beacon's radio stack.
//!
//! Talks to the SoftDevice through the raw `sd_ble_gap_adv_*` calls: the
//! high-level `nrf_softdevice::ble::peripheral::advertise` future owns the
//! advertising set for as long as it is polled, which does not fit a
//! controller that starts and stops the broadcast from plain method calls.

use defmt::{debug, info};
use embassy_executor::Spawner;
use nrf_softdevice::{raw, RawError, Softdevice};
use xm122_beacon::beacon::adv_data::{AdvKind, ADV_DATA_MAX_LEN};
use xm122_beacon::beacon::{AdvHandle, AdvertisingParams, RadioStack};
use xm122_beacon::config::CONN_CFG_TAG;
use xm122_beacon::{StackFault, StackOp};

pub struct SoftdeviceRadio {
    spawner: Spawner,
    sd: Option<&'static Softdevice>,
    /// The SoftDevice keeps reading this buffer while the set is active,
    /// hence `'static`.
    adv_buf: &'static mut [u8; ADV_DATA_MAX_LEN],
}

impl SoftdeviceRadio {
    pub fn new(spawner: Spawner, adv_buf: &'static mut [u8; ADV_DATA_MAX_LEN]) -> Self {
        Self {
            spawner,
            sd: None,
            adv_buf,
        }
    }
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        // Beacon only: one advertising set, no links.
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 0,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

fn check(op: StackOp, ret: u32) -> Result<(), StackFault> {
    RawError::convert(ret).map_err(|e| StackFault::new(op, e as u32))
}

impl RadioStack for SoftdeviceRadio {
    fn enable(&mut self) -> Result<(), StackFault> {
        // Softdevice::enable panics if the SoftDevice refuses the config.
        let sd: &'static Softdevice = Softdevice::enable(&softdevice_config());
        self.spawner
            .spawn(softdevice_task(sd))
            .map_err(|_| StackFault::new(StackOp::Enable, raw::NRF_ERROR_NO_MEM))?;
        self.sd = Some(sd);
        info!("SoftDevice enabled");
        Ok(())
    }

    fn configure_advertisement(
        &mut self,
        handle: Option<AdvHandle>,
        adv_data: &[u8],
        params: &AdvertisingParams,
    ) -> Result<AdvHandle, StackFault> {
        if self.sd.is_none() {
            return Err(StackFault::new(
                StackOp::Configure,
                raw::NRF_ERROR_INVALID_STATE,
            ));
        }
        if adv_data.len() > ADV_DATA_MAX_LEN {
            return Err(StackFault::new(
                StackOp::Configure,
                raw::NRF_ERROR_INVALID_LENGTH,
            ));
        }
        self.adv_buf[..adv_data.len()].copy_from_slice(adv_data);

        let mut raw_params: raw::ble_gap_adv_params_t = unsafe { core::mem::zeroed() };
        raw_params.properties.type_ = match params.kind {
            AdvKind::NonConnectableNonScannableUndirected => {
                raw::BLE_GAP_ADV_TYPE_NONCONNECTABLE_NONSCANNABLE_UNDIRECTED as u8
            }
        };
        raw_params.p_peer_addr = core::ptr::null();
        raw_params.filter_policy = raw::BLE_GAP_ADV_FP_ANY as u8;
        raw_params.interval = params.interval;
        raw_params.duration = params.duration;
        raw_params.primary_phy = raw::BLE_GAP_PHY_1MBPS as u8;

        let data = raw::ble_gap_adv_data_t {
            adv_data: raw::ble_data_t {
                p_data: self.adv_buf.as_mut_ptr(),
                len: adv_data.len() as u16,
            },
            scan_rsp_data: raw::ble_data_t {
                p_data: core::ptr::null_mut(),
                len: 0,
            },
        };

        let mut raw_handle = match handle {
            Some(h) => h.0,
            None => raw::BLE_GAP_ADV_SET_HANDLE_NOT_SET as u8,
        };
        check(StackOp::Configure, unsafe {
            raw::sd_ble_gap_adv_set_configure(&mut raw_handle, &data, &raw_params)
        })?;

        debug!("Advertising set {} configured", raw_handle);
        Ok(AdvHandle(raw_handle))
    }

    fn start_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault> {
        check(StackOp::Start, unsafe {
            raw::sd_ble_gap_adv_start(handle.0, CONN_CFG_TAG)
        })
    }

    fn stop_advertising(&mut self, handle: AdvHandle) -> Result<(), StackFault> {
        check(StackOp::Stop, unsafe { raw::sd_ble_gap_adv_stop(handle.0) })
    }
}
