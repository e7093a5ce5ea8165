use clap::Parser;

use lsb_stego::{
    cli::{Cli, Commands},
    handler::{
        handle_capacity, handle_hide, handle_keygen, handle_recover, handle_sign, handle_verify,
    },
};

/// 程序的主入口点
///
/// 负责初始化日志 (通过 `RUST_LOG` 调整级别)、解析命令行参数，
/// 并根据指定的子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args),
        Commands::Keygen(args) => handle_keygen(args),
        Commands::Sign(args) => handle_sign(args),
        Commands::Verify(args) => handle_verify(args),
    }
}
