use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// 根据命令行开关选择日志级别
pub fn level_for(verbose: bool, silent: bool) -> LevelFilter {
    if silent {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// 初始化终端日志，输出到stderr，结果表格独占stdout
pub fn init_logger(verbose: bool, silent: bool) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str("subrecon")
        .build();

    // 重复初始化时忽略错误
    let _ = TermLogger::init(
        level_for(verbose, silent),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
