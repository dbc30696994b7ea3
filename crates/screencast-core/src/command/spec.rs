use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A single `-name [value]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    /// Option flag including its leading dash.
    pub name: String,
    /// Value, absent for bare flags such as `-y`.
    pub value: Option<String>,
}

/// Sets `name` in `options`, replacing an existing value in place.
fn set_option(options: &mut Vec<CommandOption>, name: &str, value: Option<String>) {
    match options.iter_mut().find(|option| option.name == name) {
        Some(option) => option.value = value,
        None => options.push(CommandOption {
            name: name.to_string(),
            value,
        }),
    }
}

fn push_options(args: &mut Vec<String>, options: &[CommandOption]) {
    for option in options {
        args.push(option.name.clone());
        if let Some(value) = &option.value {
            args.push(value.clone());
        }
    }
}

/// One `-f <format> -i <path>` input with its input-scoped options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    /// Demuxer / grab device (`x11grab`, `pulse`, `dshow`...).
    pub format: String,
    /// Device address or file path.
    pub path: String,
    /// Options placed before this input's `-i`.
    pub options: Vec<CommandOption>,
    /// Whether this is a real-time device rather than a file.
    pub live: bool,
}

impl InputSource {
    /// Creates a real-time device input.
    pub fn live(format: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            path: path.into(),
            options: Vec::new(),
            live: true,
        }
    }

    /// Builder form of [`InputSource::set_option`].
    pub fn with_option(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_option(name, value);
        self
    }

    /// Sets an input option, replacing any previous value.
    pub fn set_option(&mut self, name: &str, value: impl Into<String>) {
        set_option(&mut self.options, name, Some(value.into()));
    }

    /// Value of an input option.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_deref())
    }
}

/// A `[in]filter,filter[out]` chain of the complex filter graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    /// Input pad labels, without brackets.
    pub inputs: Vec<String>,
    /// Filters applied in order.
    pub filters: Vec<String>,
    /// Output pad labels, without brackets.
    pub outputs: Vec<String>,
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.inputs {
            write!(f, "[{label}]")?;
        }
        write!(f, "{}", self.filters.join(","))?;
        for label in &self.outputs {
            write!(f, "[{label}]")?;
        }
        Ok(())
    }
}

/// The `-filter_complex` graph: chains joined by `;`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGraph {
    /// Chains in evaluation order.
    pub chains: Vec<FilterChain>,
}

impl FilterGraph {
    /// Whether the graph has no chains.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Chains containing a filter that starts with `name`.
    pub fn chains_using<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FilterChain> + 'a {
        self.chains
            .iter()
            .filter(move |chain| chain.filters.iter().any(|filter| filter.starts_with(name)))
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{chain}")?;
        }
        Ok(())
    }
}

/// The assembler's working value.
///
/// Mutated only while presets and inputs are applied, then consumed by
/// [`CommandSpec::freeze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Inputs in index order (`0` is the video grab).
    pub inputs: Vec<InputSource>,
    /// Options placed before the first input.
    pub global_options: Vec<CommandOption>,
    /// Complex filter graph.
    pub filter_graph: FilterGraph,
    /// `-map` targets in order.
    pub maps: Vec<String>,
    /// Options placed before the output path.
    pub output_options: Vec<CommandOption>,
    /// Output file.
    pub output: PathBuf,
}

impl CommandSpec {
    /// Creates an empty spec writing to `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            inputs: Vec::new(),
            global_options: Vec::new(),
            filter_graph: FilterGraph::default(),
            maps: Vec::new(),
            output_options: Vec::new(),
            output: output.into(),
        }
    }

    /// Appends an input and returns its stream index.
    pub fn add_input(&mut self, input: InputSource) -> usize {
        self.inputs.push(input);
        self.inputs.len() - 1
    }

    /// Sets a global option (`None` for a bare flag).
    pub fn set_global_option(&mut self, name: &str, value: Option<&str>) {
        set_option(&mut self.global_options, name, value.map(str::to_string));
    }

    /// Sets an output option, replacing any previous value.
    pub fn set_output_option(&mut self, name: &str, value: impl Into<String>) {
        set_option(&mut self.output_options, name, Some(value.into()));
    }

    /// Value of an output option.
    pub fn output_option(&self, name: &str) -> Option<&str> {
        self.output_options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_deref())
    }

    /// Renders the argument vector (program excluded).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_options(&mut args, &self.global_options);

        for input in &self.inputs {
            push_options(&mut args, &input.options);
            args.extend(["-f".to_string(), input.format.clone()]);
            args.extend(["-i".to_string(), input.path.clone()]);
        }

        if !self.filter_graph.is_empty() {
            args.push("-filter_complex".to_string());
            args.push(self.filter_graph.to_string());
        }

        for map in &self.maps {
            args.extend(["-map".to_string(), map.clone()]);
        }

        push_options(&mut args, &self.output_options);
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Freezes this builder into an immutable command for `program`.
    pub fn freeze(self, program: impl Into<PathBuf>) -> EncoderCommand {
        let args = self.to_args();
        EncoderCommand::new(program, args)
    }
}

/// A fully resolved encoder invocation. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl EncoderCommand {
    /// Creates a command from a program and its arguments.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Encoder binary.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Human-readable command line, quoting arguments that contain spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("\"{arg}\"")
                } else {
                    arg
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for EncoderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())
    }
}
