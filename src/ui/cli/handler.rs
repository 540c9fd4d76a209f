// Fri Oct 16 2026 - Alex

use super::args::{Args, ClassArgs, Command, DumpArgs, InputArgs, LayoutArgs, ResolveArgs};
use crate::config::Config;
use crate::dispatch::PathStep;
use crate::error::ModelResult;
use crate::hierarchy::{define_reference_hierarchy, ClassId, HierarchyDescription};
use crate::model::ObjectModel;
use crate::output::{CallOutput, ClassOutput, JsonSerializer, ModelOutput, ReportGenerator};
use crate::ui::banner::Banner;
use crate::utils::{format_duration, measure_time, LoggingUtils, ScopedTimer};
use anyhow::Context;
use colored::Colorize;
use log::info;
use rayon::prelude::*;

pub struct CommandHandler {
    config: Config,
    json: JsonSerializer,
    report: ReportGenerator,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let json = JsonSerializer::new().with_pretty_print(config.pretty_json);
        Self {
            config,
            json,
            report: ReportGenerator::new(),
        }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args);

        if let Some(path) = &args.config {
            let config = Config::from_file(path).with_context(|| format!("loading config {:?}", path))?;
            *self = Self::with_config(config);
        }

        if !args.quiet {
            Banner::default().with_color(!args.no_color).print();
        }

        match args.command {
            Command::Layout(layout_args) => self.handle_layout(layout_args),
            Command::Vtables(class_args) => self.handle_vtables(class_args),
            Command::Resolve(resolve_args) => self.handle_resolve(resolve_args),
            Command::Dump(dump_args) => self.handle_dump(dump_args),
            Command::Validate(input_args) => self.handle_validate(input_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = LoggingUtils::level_from_str(&args.log_level);
        if args.no_color {
            colored::control::set_override(false);
            LoggingUtils::init_plain(level);
        } else {
            LoggingUtils::init_logger(level);
        }
    }

    fn load_model(&self, input: &InputArgs) -> anyhow::Result<ObjectModel> {
        input.validate().map_err(|e| anyhow::anyhow!(e))?;
        let _timer = ScopedTimer::new("load hierarchy");

        let mut model = ObjectModel::new(self.config.clone());
        match &input.input {
            Some(path) => {
                let description =
                    HierarchyDescription::from_file(path).with_context(|| format!("reading {:?}", path))?;
                description
                    .load_into(&mut model)
                    .with_context(|| format!("loading {:?}", path))?;
            }
            None => {
                define_reference_hierarchy(&mut model)?;
            }
        }
        info!("Loaded {} classes", model.registry().len());
        Ok(model)
    }

    fn selected(&self, model: &ObjectModel, names: &[String]) -> anyhow::Result<Vec<ClassId>> {
        if names.is_empty() {
            return Ok(model
                .registry()
                .iter()
                .filter(|c| c.is_defined())
                .map(|c| c.id)
                .collect());
        }
        names
            .iter()
            .map(|name| model.class_id(name).map_err(anyhow::Error::from))
            .collect()
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", self.json.serialize(value)?);
        Ok(())
    }

    /// Build the export of every class in parallel; order follows `classes`.
    fn collect(&self, model: &ObjectModel, classes: &[ClassId]) -> ModelResult<Vec<ClassOutput>> {
        classes
            .par_iter()
            .map(|&class| ClassOutput::collect(model, class))
            .collect()
    }

    fn handle_layout(&self, args: LayoutArgs) -> anyhow::Result<()> {
        let model = self.load_model(&args.class.input)?;
        let classes = self.selected(&model, &args.class.classes)?;

        if args.class.input.json {
            let mut output = ModelOutput::new(&model);
            output.classes = self.collect(&model, &classes)?;
            return self.print_json(&output);
        }

        let report = ReportGenerator::new().with_subobjects(args.subobjects || self.config.enable_verbose_output);
        for class in classes {
            let layout = model.layout_of(class, !args.as_base)?;
            println!("{}", report.layout(model.registry(), &layout));
        }
        Ok(())
    }

    fn handle_vtables(&self, args: ClassArgs) -> anyhow::Result<()> {
        let model = self.load_model(&args.input)?;
        let classes = self.selected(&model, &args.classes)?;

        if args.input.json {
            let mut output = ModelOutput::new(&model);
            output.classes = self.collect(&model, &classes)?;
            return self.print_json(&output);
        }

        for class in classes {
            let vtables = model.vtables_of(class)?;
            if vtables.is_empty() {
                println!("{} {}\n", model.name_of(class).bold(), "has no vtables".dimmed());
                continue;
            }
            println!("{}", self.report.vtables(model.registry(), &vtables));
        }
        Ok(())
    }

    fn handle_resolve(&self, args: ResolveArgs) -> anyhow::Result<()> {
        let model = self.load_model(&args.input)?;
        let object = model.class_id(&args.class)?;
        let path = args
            .path
            .iter()
            .map(|step| PathStep::parse(step, model.registry()))
            .collect::<ModelResult<Vec<_>>>()?;
        let qualifier = args.qualified.as_deref().map(|q| model.class_id(q)).transpose()?;

        let target = model.resolve_in(object, &path, &args.method, qualifier)?;

        let mut call = args.class.clone();
        for step in &args.path {
            if step.starts_with('.') {
                call.push_str(step);
            } else {
                call.push_str(&format!("({})", step));
            }
        }
        call.push_str("->");
        if let Some(q) = &args.qualified {
            call.push_str(&format!("{}::", q));
        }
        call.push_str(&format!("{}()", args.method));

        if args.input.json {
            let mut output = ModelOutput::new(&model);
            output.calls.push(CallOutput::from_target(model.registry(), &call, &target));
            return self.print_json(&output);
        }
        println!("{}", self.report.call(model.registry(), &call, &target));
        Ok(())
    }

    fn handle_dump(&self, args: DumpArgs) -> anyhow::Result<()> {
        let model = self.load_model(&args.input)?;
        let classes = self.selected(&model, &[])?;

        let (collected, elapsed) = measure_time(|| self.collect(&model, &classes));
        let collected = collected?;
        info!("Built {} classes in {}", collected.len(), format_duration(elapsed));

        if args.input.json || args.output.is_some() {
            let mut output = ModelOutput::new(&model);
            output.classes = collected;
            return match &args.output {
                Some(path) => {
                    self.json.serialize_to_file(&output, path)?;
                    println!("{}", format!("Output written to: {:?}", path).green());
                    Ok(())
                }
                None => self.print_json(&output),
            };
        }

        println!("{}", self.report.summary(&collected));
        for class in classes {
            let layout = model.layout_of(class, true)?;
            println!("{}", self.report.layout(model.registry(), &layout));
            let vtables = model.vtables_of(class)?;
            if !vtables.is_empty() {
                println!("{}", self.report.vtables(model.registry(), &vtables));
            }
            println!("{}", "construction order".underline());
            println!("{}\n", self.report.construction(model.registry(), &model.construction_order(class)?));
        }
        Ok(())
    }

    fn handle_validate(&self, args: InputArgs) -> anyhow::Result<()> {
        let model = self.load_model(&args)?;
        let checked = model.check_all()?;

        if args.json {
            return self.print_json(&serde_json::json!({ "valid": true, "classes": checked }));
        }
        println!("{}", format!("{} classes laid out and validated", checked).green());
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
