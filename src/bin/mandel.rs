// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelbrot::{Click, Colormap, Display, Pixel, RenderConfig, Session, Viewport};
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_extent(s: &str) -> Option<Viewport> {
    let bounds: Vec<f64> = s
        .split(',')
        .map(|b| f64::from_str(b.trim()))
        .collect::<Result<_, _>>()
        .ok()?;
    match bounds.as_slice() {
        [x_min, x_max, y_min, y_max] => Some(Viewport::new(*x_min, *x_max, *y_min, *y_max)),
        _ => None,
    }
}

fn parse_click(s: &str) -> Option<Click> {
    parse_pair::<usize>(s, ',').map(|(column, row)| Click::Pixel(Pixel(column, row)))
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const DENSITY: &str = "density";
const EXTENT: &str = "extent";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const COLORMAP: &str = "colormap";
const GAMMA: &str = "gamma";
const THREADS: &str = "threads";
const CLICK: &str = "click";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Smooth escape-time Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; .ppm and .pnm are written as binary pixmaps"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("9")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1000,
                        "Could not parse width",
                        "Width must be between 1 and 1000",
                    )
                })
                .help("Width of the image, in units"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .short("H")
                .takes_value(true)
                .default_value("6")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1000,
                        "Could not parse height",
                        "Height must be between 1 and 1000",
                    )
                })
                .help("Height of the image, in units"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .default_value("72")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1000,
                        "Could not parse density",
                        "Density must be between 1 and 1000",
                    )
                })
                .help("Pixels per unit"),
        )
        .arg(
            Arg::with_name(EXTENT)
                .long(EXTENT)
                .short("e")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,1,-1,1")
                .validator(|s| match parse_extent(&s) {
                    Some(_) => Ok(()),
                    None => Err(
                        "Could not parse extent; expected x_min,x_max,y_min,y_max".to_string(),
                    ),
                })
                .help("Region of the complex plane to render: x_min,x_max,y_min,y_max"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("128")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        ::std::f64::MIN_POSITIVE,
                        1e12,
                        "Could not parse zoom factor",
                        "Zoom factor must be positive",
                    )
                })
                .help("How far each click zooms in"),
        )
        .arg(
            Arg::with_name(COLORMAP)
                .long(COLORMAP)
                .short("c")
                .takes_value(true)
                .default_value("cubehelix")
                .validator(|s| Colormap::from_str(&s).map(|_| ()))
                .help("Colour map: gray, cubehelix or gnuplot2"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .long(GAMMA)
                .short("g")
                .takes_value(true)
                .default_value("0.3")
                .validator(|s| {
                    validate_range(
                        &s,
                        0.01,
                        100.0,
                        "Could not parse gamma",
                        "Gamma must be between 0.01 and 100",
                    )
                })
                .help("Exponent of the power-law colour normalisation"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the sampler [default: all cores]"),
        )
        .arg(
            Arg::with_name(CLICK)
                .long(CLICK)
                .short("k")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| {
                    validate_pair::<usize>(&s, ',', "Could not parse click; expected column,row")
                })
                .help("Zoom in on this pixel of the current image and redraw; repeatable"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, failure::Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| failure::err_msg(format!("Missing value for --{}", name)))?;
    T::from_str(raw)
        .map_err(|_| failure::err_msg(format!("Could not parse --{} '{}'", name, raw)))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, failure::Error> {
    let extent = matches
        .value_of(EXTENT)
        .and_then(parse_extent)
        .ok_or_else(|| failure::err_msg("Error parsing extent"))?;
    let colormap = matches
        .value_of(COLORMAP)
        .ok_or_else(|| failure::err_msg("Missing colour map"))?
        .parse::<Colormap>()
        .map_err(failure::err_msg)?;
    Ok(RenderConfig {
        width: value(matches, WIDTH)?,
        height: value(matches, HEIGHT)?,
        density: value(matches, DENSITY)?,
        extent,
        max_iter: value(matches, ITERATIONS)?,
        zoom: value(matches, ZOOM)?,
        colormap,
        gamma: value(matches, GAMMA)?,
    })
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let config = config(matches)?;
    let threads: usize = match matches.value_of(THREADS) {
        Some(_) => value(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| failure::err_msg("Missing output file"))?;
    let clicks = match matches.values_of(CLICK) {
        Some(values) => values
            .map(|s| {
                parse_click(s)
                    .ok_or_else(|| failure::err_msg(format!("Error parsing click '{}'", s)))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![],
    };

    let mut session = Session::new(config)?;
    let mut display = Display::new(output, config.colormap, config.norm());
    display.show(&session.render(threads)?)?;

    for click in clicks {
        if session.click(click)?.is_some() {
            display.show(&session.render(threads)?)?;
        }
    }

    let viewport = session.viewport();
    info!(
        "final extent {},{},{},{}",
        viewport.x_min, viewport.x_max, viewport.y_min, viewport.y_max
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_parse_on_the_separator() {
        assert_eq!(parse_pair::<usize>("640x480", 'x'), Some((640, 480)));
        assert_eq!(parse_pair::<f64>("-0.5,0.25", ','), Some((-0.5, 0.25)));
        assert_eq!(parse_pair::<usize>("640", 'x'), None);
        assert_eq!(parse_pair::<usize>("640x", 'x'), None);
    }

    #[test]
    fn extents_need_four_numbers() {
        assert_eq!(parse_extent("-2,1,-1,1"), Some(Viewport::new(-2.0, 1.0, -1.0, 1.0)));
        assert_eq!(
            parse_extent("-0.35, 0.08, 0.63, 1"),
            Some(Viewport::new(-0.35, 0.08, 0.63, 1.0))
        );
        assert_eq!(parse_extent("-2,1,-1"), None);
        assert_eq!(parse_extent("-2,1,-1,x"), None);
    }

    #[test]
    fn clicks_are_pixels() {
        assert_eq!(parse_click("10,20"), Some(Click::Pixel(Pixel(10, 20))));
        assert_eq!(parse_click("-1,20"), None);
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(validate_range(&"1".to_string(), 1, 4, "nan", "range").is_ok());
        assert!(validate_range(&"4".to_string(), 1, 4, "nan", "range").is_ok());
        assert_eq!(
            validate_range(&"5".to_string(), 1, 4, "nan", "range"),
            Err("range".to_string())
        );
        assert_eq!(
            validate_range(&"x".to_string(), 1, 4, "nan", "range"),
            Err("nan".to_string())
        );
    }
}
