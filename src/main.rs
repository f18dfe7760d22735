fn main() {
    bracket_draw_lib::run()
}
