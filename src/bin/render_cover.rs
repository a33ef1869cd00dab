//! 本地工具：按命令行参数渲染一张封面并写入文件。
//!
//! 与 HTTP 接口走同一个 `CoverService`，海报拉取失败同样回退到占位图。

use std::fs;
use std::path::PathBuf;

use course_post_backend::AppConfig;
use course_post_backend::features::cover::{CoverService, RenderRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_post_backend=info".into()),
        )
        .try_init();

    let args = Args::parse(std::env::args().skip(1).collect());
    if args.help {
        print_help();
        return Ok(());
    }

    let config = AppConfig::load()?;
    let service = CoverService::new(config.cover.clone(), 1)?;

    let rendered = service
        .render_cover(RenderRequest {
            poster_source: args.poster,
            title: args.title,
            year: args.year,
            duration: args.duration,
            subtitle: args.subtitle,
        })
        .await?;

    fs::write(&args.out_path, &rendered.png)?;
    println!(
        "已写入: {} ({}x{}, {} 字节)",
        args.out_path.display(),
        rendered.width,
        rendered.height,
        rendered.png.len()
    );
    if args.print_layout {
        println!("{}", serde_json::to_string_pretty(&rendered.layout)?);
    }

    Ok(())
}

struct Args {
    help: bool,
    poster: Option<String>,
    title: String,
    subtitle: Option<String>,
    year: String,
    duration: String,
    out_path: PathBuf,
    print_layout: bool,
}

impl Args {
    fn parse(argv: Vec<String>) -> Self {
        let mut args = Self {
            help: false,
            poster: None,
            title: String::new(),
            subtitle: None,
            year: String::new(),
            duration: String::new(),
            out_path: PathBuf::from("cover.png"),
            print_layout: false,
        };

        let mut it = argv.into_iter();
        while let Some(a) = it.next() {
            match a.as_str() {
                "-h" | "--help" => args.help = true,
                "--poster" => args.poster = it.next(),
                "--title" => args.title = it.next().unwrap_or_default(),
                "--subtitle" => args.subtitle = it.next(),
                "--year" => args.year = it.next().unwrap_or_default(),
                "--duration" => args.duration = it.next().unwrap_or_default(),
                "--out" => {
                    if let Some(v) = it.next() {
                        args.out_path = PathBuf::from(v);
                    }
                }
                "--layout" => args.print_layout = true,
                _ => {}
            }
        }
        args
    }
}

fn print_help() {
    println!(
        r#"render_cover（本地封面渲染工具）

用法：
  cargo run --bin render_cover -- --poster https://i.ytimg.com/vi/ID/maxresdefault.jpg \
      --title "Курс по SQL" --subtitle "Основы баз данных" --year 2022 --duration "15 часов"

参数：
  --poster URL        海报地址（必填，缺失时报 INVALID_INPUT）
  --title TEXT        标题（空白时使用占位标题）
  --subtitle TEXT     副标题（可选）
  --year TEXT         年份文字
  --duration TEXT     时长文字
  --out PATH          输出文件（默认 cover.png）
  --layout            额外打印排版矩形（JSON）
  -h, --help          显示帮助
"#
    );
}
