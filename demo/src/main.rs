use dotenv::dotenv;
use hd44780_4bit::platform::{GpiodPlatform, LcdPinMap};
use hd44780_4bit::{DisplayConfig, GpioHD44780Driver, HD44780Driver};
use log::{debug, info, warn};
use std::env::var;
use std::thread::sleep;
use std::time::Duration;
use time::OffsetDateTime;

fn parse_pin_bus(pin_str: &str) -> eyre::Result<[u32; 4]> {
    pin_str
        .split([',', ' ', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()?
        .try_into()
        .map_err(|_| eyre::eyre!("Invalid number of data pins"))
}

fn load_display_config() -> eyre::Result<DisplayConfig> {
    match var("LCD_CONFIG") {
        Ok(path) => {
            let file = std::fs::File::open(&path)?;
            let reader = std::io::BufReader::new(file);
            let config = serde_json::from_reader(reader)?;
            debug!("Display config loaded from {}", path);
            Ok(config)
        }
        Err(_) => Ok(DisplayConfig::default()),
    }
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("HD44780 demo starting...");

    let chip = var("LCD_GPIO_CHIP").unwrap_or_else(|_| "/dev/gpiochip0".to_string());
    let pin_map = LcdPinMap {
        rs: var("LCD_PIN_RS")?.parse()?,
        rw: var("LCD_PIN_RW")?.parse()?,
        e: var("LCD_PIN_E")?.parse()?,
        data: parse_pin_bus(&var("LCD_PINS_DATA")?)?,
    };
    let config = load_display_config()?;

    info!("LCD @ {} RS: {}, RW: {}, E: {}, Data: {:?}",
        chip, pin_map.rs, pin_map.rw, pin_map.e, pin_map.data);
    info!("Display {}x{}", config.columns, config.rows);

    debug!("Initializing LCD driver...");
    let platform = GpiodPlatform::open(&chip, pin_map)?;
    let lcd = GpioHD44780Driver::new(&config, &platform);

    lcd.init()?;
    lcd.apply_preferences()?;
    debug!("{:?} initialized.", lcd);

    lcd.set_cursor(1, 1)?;
    lcd.print_str("Hello!")?;

    loop {
        let now = OffsetDateTime::now_local().unwrap_or_else(|err| {
            warn!("Local time unavailable ({}), using UTC", err);
            OffsetDateTime::now_utc()
        });

        lcd.set_cursor(2, 1)?;
        lcd.print_str(format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second()))?;

        sleep(Duration::from_secs(1));
    }
}
