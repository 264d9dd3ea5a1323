fn main() {
    sensor_rca_lib::run()
}
