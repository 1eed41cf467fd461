// ============================================================================
// Basic Usage Example
// ============================================================================

use fixed_point::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Fixed-Point Example ===\n");

    println!("Layouts:");
    println!("  Fp16: {} (resolution {})", Fp16::FORMAT, Fp16::FORMAT.resolution());
    println!("  Fp32: {} (resolution {})", Fp32::FORMAT, Fp32::FORMAT.resolution());

    // Arithmetic stays in raw-integer space
    println!("\n=== Arithmetic ===");
    let a = fp16(2.5);
    let b = fp16(4.0);
    println!("{} + {} = {}", a, b, a + b);
    println!("{} - {} = {}", a, b, a - b);
    println!("{} * {} = {}", a, b, a * b);
    println!("{} / {} = {}", a, b, a / b);
    println!("{} % {} = {}", fp16(7.5), fp16(2), fp16(7.5) % fp16(2));

    // Conversions floor toward negative infinity
    println!("\n=== Conversions ===");
    for value in [66.3, -66.3] {
        let x = fp16(value);
        println!("{:>6} -> {:?} -> to_int = {}", value, x, x.to_int::<i32>());
    }
    println!("1/3 in Fp32 to 4 places: {:.4}", fp32(1) / fp32(3));
    println!("Fp32 0.1 as decimal: {}", fp32(0.1).to_decimal());

    // Wrapping operators vs checked variants
    println!("\n=== Overflow ===");
    let big = fp16(100);
    println!("{} * {} wraps to {}", big, big, big * big);
    match big.checked_mul(big) {
        Ok(v) => println!("checked: {}", v),
        Err(e) => println!("checked: {}", e),
    }
    match fp16(1).checked_div(Fp16::ZERO) {
        Ok(v) => println!("checked: {}", v),
        Err(e) => println!("checked: {}", e),
    }

    // Runtime scale, aligned to the coarser operand
    println!("\n=== Dynamic Scale ===");
    let fine = DynFp16::from(fp16(1.75));
    match DynFp16::from_f64(0.5, 2) {
        Ok(coarse) => {
            let sum = fine + coarse;
            println!(
                "{} (Q{}) + {} (Q{}) = {} (Q{})",
                fine,
                fine.frac_bits(),
                coarse,
                coarse.frac_bits(),
                sum,
                sum.frac_bits()
            );
            println!("as Fp16: {}", sum.to_fixed::<8>());
        },
        Err(e) => println!("invalid scale: {}", e),
    }
}
