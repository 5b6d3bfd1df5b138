const MICROSECONDS_PER_SECOND:f64 = 1.0E6;

pub fn us_to_sec(t_microseconds:f64) -> f64 {
    t_microseconds/MICROSECONDS_PER_SECOND
}

pub fn sec_to_us(seconds:f64) -> f64 {
    seconds*MICROSECONDS_PER_SECOND
}

pub fn sec_to_ms(seconds:f64) -> f64 {
    seconds*1.0E3
}

// human readable duration for timelines
pub fn format_duration(seconds:f64) -> String {
    let magnitude = seconds.abs();
    if magnitude >= 1.0 || magnitude == 0.0 {
        format!("{:.3} s",seconds)
    }else if magnitude >= 1.0E-3 {
        format!("{:.3} ms",sec_to_ms(seconds))
    }else {
        format!("{:.1} us",sec_to_us(seconds))
    }
}

#[test]
fn test_conversions() {
    assert_eq!(us_to_sec(500.0),500.0E-6);
    assert_eq!(sec_to_us(0.25),250_000.0);
    assert_eq!(format_duration(1.0),"1.000 s");
    assert_eq!(format_duration(0.0),"0.000 s");
    assert_eq!(format_duration(1.0/300.0),"3.333 ms");
    assert_eq!(format_duration(30.0E-6),"30.0 us");
}
