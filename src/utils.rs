use crate::{Error, Result};

#[macro_export]
macro_rules! is_power_of_2 {
    ($x:expr) => {
        ($x) != 0 && ($x) & (($x) - 1) == 0
    };
}

#[inline]
pub fn div_round_up(x: u32, y: u32) -> u32 {
    debug_assert!(y != 0);
    x / y + if x % y != 0 { 1 } else { 0 }
}

/// Allocate a zeroed buffer, reporting failure instead of aborting.
pub fn allocate_u8_vector(len: usize) -> Result<Vec<u8>> {
    let mut v: Vec<u8> = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure(len))?;
    v.resize(len, 0);
    Ok(v)
}

#[cfg(test)]
#[test]
fn test_div_round_up() {
    crate::tests_init();

    assert_eq!(div_round_up(0, 512), 0);
    assert_eq!(div_round_up(54, 512), 1);
    assert_eq!(div_round_up(512, 512), 1);
    assert_eq!(div_round_up(513, 512), 2);
    assert_eq!(div_round_up(7168, 512), 14);
    assert_eq!(div_round_up(100, 3), 34);
}

#[cfg(test)]
#[test]
fn test_is_power_of_2() {
    crate::tests_init();

    assert!(!is_power_of_2!(0));
    assert!(!is_power_of_2!(7));
    assert!(is_power_of_2!(8));
    assert!(!is_power_of_2!(63));
    assert!(is_power_of_2!(512));
    assert!(!is_power_of_2!(513));
}

#[cfg(test)]
#[test]
fn test_allocate_u8_vector() {
    crate::tests_init();

    let v = allocate_u8_vector(4096).unwrap();
    assert_eq!(v.len(), 4096);
    assert!(v.iter().all(|&x| x == 0));

    assert!(matches!(
        allocate_u8_vector(usize::MAX),
        Err(Error::AllocationFailure(usize::MAX))
    ));
}
