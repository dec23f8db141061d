/// 1 if the person reported any capital gain or loss, else 0.
pub fn pays_capital_tax(capital_gain: i64, capital_loss: i64) -> u8 {
    u8::from(capital_gain != 0 || capital_loss != 0)
}
